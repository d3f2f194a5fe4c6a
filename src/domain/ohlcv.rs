//! OHLCV bar representation.

use chrono::{DateTime, Utc};

/// One OHLCV sample. Bars arrive in non-decreasing timestamp order.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Returns true when timestamps never decrease across the slice.
pub fn is_time_ordered(bars: &[Bar]) -> bool {
    bars.windows(2).all(|w| w[0].timestamp <= w[1].timestamp)
}
