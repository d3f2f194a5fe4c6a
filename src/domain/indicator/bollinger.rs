//! Bollinger Bands over closing prices.
//!
//! - Middle: simple moving average over `period` closes
//! - Upper: middle + (multiplier × stddev)
//! - Lower: middle - (multiplier × stddev)
//!
//! Warmup: the first (period-1) bars carry no bands. Bands for bar i only use
//! bars at or before i.

use crate::domain::indicator::stddev::{mean_close, stddev_close};
use crate::domain::indicator::{AnnotatedBar, AnnotatedSeries, Bands, BollingerParams};
use crate::domain::ohlcv::Bar;

pub fn calculate_bollinger(bars: &[Bar], params: BollingerParams) -> AnnotatedSeries {
    let mut annotated = Vec::with_capacity(bars.len());
    let period = params.period;
    let mult = params.multiplier();

    for i in 0..bars.len() {
        let bands = if period > 0 && i + 1 >= period {
            let window = &bars[i + 1 - period..=i];
            let middle = mean_close(window);
            let stddev = stddev_close(window, middle, params.deviation);

            Some(Bands {
                upper: middle + mult * stddev,
                middle,
                lower: middle - mult * stddev,
            })
        } else {
            None
        };

        annotated.push(AnnotatedBar {
            bar: bars[i].clone(),
            bands,
        });
    }

    AnnotatedSeries {
        params,
        bars: annotated,
    }
}
