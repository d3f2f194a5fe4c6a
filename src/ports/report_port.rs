//! Report rendering port.

use crate::domain::engine::TickOutcome;
use crate::domain::error::BandtraderError;
use crate::domain::session::Session;

/// Port for presenting session state after a tick. Implementations only read.
pub trait ReportPort {
    fn write_status(
        &mut self,
        session: &Session,
        outcome: &TickOutcome,
    ) -> Result<(), BandtraderError>;
}
