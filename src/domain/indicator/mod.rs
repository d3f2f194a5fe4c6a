//! Bollinger Band indicator types.
//!
//! - `BollingerParams`: window, multiplier and deviation convention
//! - `Bands`: one computed envelope (upper / middle / lower)
//! - `AnnotatedBar`: a bar plus its bands, absent during warmup
//! - `AnnotatedSeries`: the ordered bars a tick is evaluated against

pub mod bollinger;
pub mod stddev;

use std::fmt;

use crate::domain::ohlcv::Bar;

/// Trailing window used by the trading rule.
pub const DEFAULT_PERIOD: usize = 20;

/// Band half-width in standard deviations, x100 so params stay hashable.
pub const DEFAULT_STDDEV_MULT_X100: u32 = 200;

/// Standard deviation convention applied to every window of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Deviation {
    /// Divides by N.
    Population,
    /// Divides by N - 1.
    #[default]
    Sample,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BollingerParams {
    pub period: usize,
    pub stddev_mult_x100: u32,
    pub deviation: Deviation,
}

impl BollingerParams {
    pub fn multiplier(&self) -> f64 {
        self.stddev_mult_x100 as f64 / 100.0
    }
}

impl Default for BollingerParams {
    fn default() -> Self {
        BollingerParams {
            period: DEFAULT_PERIOD,
            stddev_mult_x100: DEFAULT_STDDEV_MULT_X100,
            deviation: Deviation::Sample,
        }
    }
}

impl fmt::Display for BollingerParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BOLLINGER({},{})", self.period, self.multiplier())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedBar {
    pub bar: Bar,
    pub bands: Option<Bands>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedSeries {
    pub params: BollingerParams,
    pub bars: Vec<AnnotatedBar>,
}

impl AnnotatedSeries {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest(&self) -> Option<&AnnotatedBar> {
        self.bars.last()
    }

    /// Number of bars that carry bands.
    pub fn banded_count(&self) -> usize {
        self.bars.iter().filter(|b| b.bands.is_some()).count()
    }
}
