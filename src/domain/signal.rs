//! Band-touch signal detection.
//!
//! BUY when the bar's low touches or pierces the lower band and the portfolio
//! is not already long; SELL when the high touches or pierces the upper band
//! and the portfolio is not already short. BUY is checked first.

use std::fmt;

use crate::domain::indicator::Bands;
use crate::domain::ohlcv::Bar;
use crate::domain::portfolio::{Position, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
}

impl Signal {
    pub fn side(self) -> Side {
        match self {
            Signal::Buy => Side::Buy,
            Signal::Sell => Side::Sell,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => f.write_str("BUY"),
            Signal::Sell => f.write_str("SELL"),
        }
    }
}

pub fn detect_signal(bar: &Bar, bands: &Bands, position: Position) -> Option<Signal> {
    if bar.low <= bands.lower && position != Position::Long {
        return Some(Signal::Buy);
    }
    if bar.high >= bands.upper && position != Position::Short {
        return Some(Signal::Sell);
    }
    None
}
