//! Market data access port.

use crate::domain::error::BandtraderError;
use crate::domain::ohlcv::Bar;

pub trait DataPort {
    /// Bars for `symbol` in non-decreasing timestamp order, possibly empty.
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<Bar>, BandtraderError>;
}
