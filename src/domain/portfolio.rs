//! Portfolio state, trade log and valuation history.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// The engine's belief about directional exposure, distinct from share count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Position {
    #[default]
    Flat,
    Long,
    Short,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Position::Flat => "Neutral",
            Position::Long => "Long",
            Position::Short => "Short",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("BUY"),
            Side::Sell => f.write_str("SELL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub quantity: u32,
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationSnapshot {
    pub timestamp: DateTime<Utc>,
    pub cash: f64,
    pub holdings_value: f64,
    pub total: f64,
}

/// Mutable session aggregate. Fields are public for read-only presentation;
/// only the execution module and [`Portfolio::reset`] mutate them.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_capital: f64,
    pub holdings: u32,
    pub position: Position,
    pub transactions: Vec<Transaction>,
    pub valuations: Vec<ValuationSnapshot>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Portfolio {
            cash: initial_capital,
            initial_capital,
            holdings: 0,
            position: Position::Flat,
            transactions: Vec::new(),
            valuations: Vec::new(),
        }
    }

    /// Replaces every field with a freshly initialised portfolio.
    pub fn reset(&mut self, initial_capital: f64) {
        *self = Portfolio::new(initial_capital);
    }

    pub fn holdings_value(&self, price: f64) -> f64 {
        self.holdings as f64 * price
    }

    pub fn total_value(&self, price: f64) -> f64 {
        self.cash + self.holdings_value(price)
    }

    pub fn last_transaction(&self) -> Option<&Transaction> {
        self.transactions.last()
    }

    pub fn trade_count(&self) -> usize {
        self.transactions.len()
    }

    pub(crate) fn record_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// Appends a snapshot valued at `price` and returns it.
    pub(crate) fn record_valuation(
        &mut self,
        timestamp: DateTime<Utc>,
        price: f64,
    ) -> &ValuationSnapshot {
        self.valuations.push(ValuationSnapshot {
            timestamp,
            cash: self.cash,
            holdings_value: self.holdings_value(price),
            total: self.total_value(price),
        });
        &self.valuations[self.valuations.len() - 1]
    }
}
