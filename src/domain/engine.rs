//! Per-tick signal evaluation and order execution.
//!
//! A tick looks only at the latest annotated bar. A crossing that happened
//! between two ticks is not replayed.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::execution::{ExecutionConfig, OrderOutcome, execute_order};
use super::indicator::AnnotatedSeries;
use super::portfolio::{Portfolio, ValuationSnapshot};
use super::signal::{Signal, detect_signal};

/// Fewer bars than this and the engine never evaluates.
pub const MIN_BARS_FOR_SIGNAL: usize = 2;

/// A tick that reached the decision rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The branch entered, reported whether or not the order posted.
    pub signal: Option<Signal>,
    pub order: Option<OrderOutcome>,
    pub price: f64,
    pub valuation: ValuationSnapshot,
}

impl Evaluation {
    /// True when a signal fired and the order actually posted.
    pub fn traded(&self) -> bool {
        self.order.as_ref().is_some_and(OrderOutcome::is_filled)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The data source returned nothing usable.
    DataUnavailable,
    /// Too few bars, or the latest bar has no bands yet.
    InsufficientHistory { bars: usize },
    Evaluated(Evaluation),
}

impl TickOutcome {
    pub fn signal(&self) -> Option<Signal> {
        match self {
            TickOutcome::Evaluated(eval) => eval.signal,
            _ => None,
        }
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        match self {
            TickOutcome::Evaluated(eval) => Some(eval),
            _ => None,
        }
    }
}

/// Evaluate the latest bar of `series` against `portfolio`.
///
/// At most one order is attempted. Every evaluated tick appends exactly one
/// valuation snapshot at the latest close, whatever the order outcome.
pub fn evaluate_tick(
    series: &AnnotatedSeries,
    portfolio: &mut Portfolio,
    config: &ExecutionConfig,
    now: DateTime<Utc>,
) -> TickOutcome {
    if series.len() < MIN_BARS_FOR_SIGNAL {
        debug!(bars = series.len(), "not enough bars to evaluate");
        return TickOutcome::InsufficientHistory { bars: series.len() };
    }

    let Some(latest) = series.latest() else {
        return TickOutcome::InsufficientHistory { bars: 0 };
    };
    let Some(bands) = latest.bands else {
        debug!(
            bars = series.len(),
            period = series.params.period,
            "latest bar has no bands"
        );
        return TickOutcome::InsufficientHistory { bars: series.len() };
    };

    let bar = &latest.bar;
    let signal = detect_signal(bar, &bands, portfolio.position);
    debug!(
        low = bar.low,
        high = bar.high,
        lower = bands.lower,
        upper = bands.upper,
        ?signal,
        "evaluated latest bar"
    );

    let order =
        signal.map(|s| execute_order(portfolio, s.side(), bar.close, now, config));
    let valuation = portfolio.record_valuation(now, bar.close).clone();

    TickOutcome::Evaluated(Evaluation {
        signal,
        order,
        price: bar.close,
        valuation,
    })
}
