//! Standard deviation over a window of closing prices.
//!
//! Population: sqrt(sum((C - mean)^2) / n)
//! Sample:     sqrt(sum((C - mean)^2) / (n - 1)), zero for a single value.

use crate::domain::indicator::Deviation;
use crate::domain::ohlcv::Bar;

pub fn mean_close(window: &[Bar]) -> f64 {
    window.iter().map(|b| b.close).sum::<f64>() / window.len() as f64
}

pub fn stddev_close(window: &[Bar], mean: f64, deviation: Deviation) -> f64 {
    let n = window.len();
    let divisor = match deviation {
        Deviation::Population => n,
        Deviation::Sample => n.saturating_sub(1),
    };
    if divisor == 0 {
        return 0.0;
    }

    let variance: f64 = window
        .iter()
        .map(|b| {
            let diff = b.close - mean;
            diff * diff
        })
        .sum::<f64>()
        / divisor as f64;

    variance.sqrt()
}
