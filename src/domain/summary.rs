//! Read-only summaries for the presentation layer.

use crate::domain::indicator::AnnotatedSeries;
use crate::domain::portfolio::{Portfolio, Position, Transaction};

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSummary {
    pub current_price: f64,
    pub cash: f64,
    pub holdings: u32,
    pub holdings_value: f64,
    pub total_value: f64,
    pub profit_loss: f64,
    pub profit_loss_pct: f64,
    pub position: Position,
    pub total_trades: usize,
    pub last_trade: Option<Transaction>,
}

impl PerformanceSummary {
    /// Values the portfolio at `current_price`; P&L is against initial capital.
    pub fn compute(portfolio: &Portfolio, current_price: f64) -> Self {
        let holdings_value = portfolio.holdings_value(current_price);
        let total_value = portfolio.total_value(current_price);
        let profit_loss = total_value - portfolio.initial_capital;
        let profit_loss_pct = if portfolio.initial_capital > 0.0 {
            profit_loss / portfolio.initial_capital * 100.0
        } else {
            0.0
        };

        PerformanceSummary {
            current_price,
            cash: portfolio.cash,
            holdings: portfolio.holdings,
            holdings_value,
            total_value,
            profit_loss,
            profit_loss_pct,
            position: portfolio.position,
            total_trades: portfolio.trade_count(),
            last_trade: portfolio.last_transaction().cloned(),
        }
    }
}

/// Session extremes and the most recent print.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSummary {
    pub high: f64,
    pub low: f64,
    pub last_close: f64,
    pub last_volume: u64,
}

impl MarketSummary {
    pub fn compute(series: &AnnotatedSeries) -> Option<Self> {
        let latest = series.latest()?;
        let high = series
            .bars
            .iter()
            .map(|b| b.bar.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let low = series
            .bars
            .iter()
            .map(|b| b.bar.low)
            .fold(f64::INFINITY, f64::min);

        Some(MarketSummary {
            high,
            low,
            last_close: latest.bar.close,
            last_volume: latest.bar.volume,
        })
    }
}
