//! Fixed-quantity market order execution.
//!
//! BUY debits price * quantity * (1 + r); SELL credits price * quantity * (1 - r),
//! where r is the transaction cost rate. Guard failures leave the portfolio
//! untouched and are reported, never raised.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::portfolio::{Portfolio, Position, Side, Transaction};

/// Per-session order parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionConfig {
    pub order_quantity: u32,
    /// Percentage of notional, e.g. 0.05 means 0.05%.
    pub transaction_cost_pct: f64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            order_quantity: 10,
            transaction_cost_pct: 0.05,
        }
    }
}

impl ExecutionConfig {
    pub fn cost_rate(&self) -> f64 {
        self.transaction_cost_pct / 100.0
    }
}

/// Transaction cost on a trade value: trade_value * pct / 100.
pub fn calculate_cost(trade_value: f64, config: &ExecutionConfig) -> f64 {
    trade_value * config.cost_rate()
}

/// Result of an order attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderOutcome {
    Filled(Transaction),
    InsufficientFunds { required: f64, available: f64 },
    InsufficientHoldings { required: u32, held: u32 },
}

impl OrderOutcome {
    pub fn is_filled(&self) -> bool {
        matches!(self, OrderOutcome::Filled(_))
    }
}

/// Buy `order_quantity` shares at `price`.
///
/// The guard covers the full debit including cost, so cash never goes
/// negative.
pub fn execute_buy(
    portfolio: &mut Portfolio,
    price: f64,
    timestamp: DateTime<Utc>,
    config: &ExecutionConfig,
) -> OrderOutcome {
    let quantity = config.order_quantity;
    let notional = price * quantity as f64;
    let total_cost = notional + calculate_cost(notional, config);

    if portfolio.cash < total_cost {
        warn!(
            price,
            quantity,
            required = total_cost,
            available = portfolio.cash,
            "buy skipped: insufficient funds"
        );
        return OrderOutcome::InsufficientFunds {
            required: total_cost,
            available: portfolio.cash,
        };
    }

    portfolio.cash -= total_cost;
    portfolio.holdings += quantity;
    portfolio.position = Position::Long;

    let transaction = Transaction {
        timestamp,
        price,
        quantity,
        side: Side::Buy,
    };
    portfolio.record_transaction(transaction.clone());
    info!(price, quantity, cash = portfolio.cash, "buy filled");

    OrderOutcome::Filled(transaction)
}

/// Sell `order_quantity` shares at `price`.
pub fn execute_sell(
    portfolio: &mut Portfolio,
    price: f64,
    timestamp: DateTime<Utc>,
    config: &ExecutionConfig,
) -> OrderOutcome {
    let quantity = config.order_quantity;

    if portfolio.holdings < quantity {
        warn!(
            price,
            quantity,
            held = portfolio.holdings,
            "sell skipped: insufficient holdings"
        );
        return OrderOutcome::InsufficientHoldings {
            required: quantity,
            held: portfolio.holdings,
        };
    }

    let notional = price * quantity as f64;
    portfolio.cash += notional - calculate_cost(notional, config);
    portfolio.holdings -= quantity;
    portfolio.position = Position::Short;

    let transaction = Transaction {
        timestamp,
        price,
        quantity,
        side: Side::Sell,
    };
    portfolio.record_transaction(transaction.clone());
    info!(price, quantity, cash = portfolio.cash, "sell filled");

    OrderOutcome::Filled(transaction)
}

pub fn execute_order(
    portfolio: &mut Portfolio,
    side: Side,
    price: f64,
    timestamp: DateTime<Utc>,
    config: &ExecutionConfig,
) -> OrderOutcome {
    match side {
        Side::Buy => execute_buy(portfolio, price, timestamp, config),
        Side::Sell => execute_sell(portfolio, price, timestamp, config),
    }
}
