//! Trading session: configuration plus the one live portfolio.
//!
//! The session is the single owner of its portfolio. `tick`, `reset` and
//! `reconfigure` all take `&mut self`, so a reset can only happen strictly
//! before or strictly after an evaluation.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::config_validation::validate_session;
use super::engine::{TickOutcome, evaluate_tick};
use super::error::BandtraderError;
use super::execution::ExecutionConfig;
use super::indicator::bollinger::calculate_bollinger;
use super::indicator::{AnnotatedSeries, BollingerParams};
use super::ohlcv::{Bar, is_time_ordered};
use super::portfolio::Portfolio;
use crate::ports::data_port::DataPort;

pub const DEFAULT_SYMBOL: &str = "TCS.NS";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_ORDER_QUANTITY: u32 = 10;
pub const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;
pub const DEFAULT_TRANSACTION_COST_PCT: f64 = 0.05;

/// Parameters fixed for the lifetime of a portfolio.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub symbol: String,
    pub refresh_interval_secs: u64,
    pub order_quantity: u32,
    pub initial_capital: f64,
    pub transaction_cost_pct: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            symbol: DEFAULT_SYMBOL.to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            order_quantity: DEFAULT_ORDER_QUANTITY,
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            transaction_cost_pct: DEFAULT_TRANSACTION_COST_PCT,
        }
    }
}

impl SessionConfig {
    pub fn execution_config(&self) -> ExecutionConfig {
        ExecutionConfig {
            order_quantity: self.order_quantity,
            transaction_cost_pct: self.transaction_cost_pct,
        }
    }

    pub fn validate(&self) -> Result<(), BandtraderError> {
        validate_session(self)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    params: BollingerParams,
    portfolio: Portfolio,
    series: Option<AnnotatedSeries>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_params(config, BollingerParams::default())
    }

    pub fn with_params(config: SessionConfig, params: BollingerParams) -> Self {
        let portfolio = Portfolio::new(config.initial_capital);
        Session {
            config,
            params,
            portfolio,
            series: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn params(&self) -> BollingerParams {
        self.params
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Series annotated on the most recent tick that had data.
    pub fn series(&self) -> Option<&AnnotatedSeries> {
        self.series.as_ref()
    }

    /// Replace the portfolio with a fresh one at the configured capital.
    pub fn reset(&mut self) {
        self.portfolio.reset(self.config.initial_capital);
        info!(
            symbol = %self.config.symbol,
            initial_capital = self.config.initial_capital,
            "portfolio reset"
        );
    }

    /// Swap in a new configuration. Always resets the portfolio.
    pub fn reconfigure(&mut self, config: SessionConfig) {
        self.config = config;
        self.series = None;
        self.reset();
    }

    /// Run one tick against an already fetched bar sequence.
    ///
    /// Bars out of timestamp order are sorted before annotation, so the
    /// evaluated bar is always the newest one.
    pub fn tick(&mut self, bars: &[Bar], now: DateTime<Utc>) -> TickOutcome {
        if bars.is_empty() {
            warn!(symbol = %self.config.symbol, "no bars available, skipping tick");
            return TickOutcome::DataUnavailable;
        }

        let sorted;
        let bars = if is_time_ordered(bars) {
            bars
        } else {
            warn!(symbol = %self.config.symbol, "bars out of order, sorting by timestamp");
            let mut owned = bars.to_vec();
            owned.sort_by_key(|b| b.timestamp);
            sorted = owned;
            &sorted[..]
        };

        let series = calculate_bollinger(bars, self.params);
        let outcome = evaluate_tick(
            &series,
            &mut self.portfolio,
            &self.config.execution_config(),
            now,
        );
        self.series = Some(series);
        outcome
    }

    /// Fetch bars for the configured symbol and run one tick.
    ///
    /// A failing fetch counts as unavailable data; the portfolio is untouched.
    pub fn tick_from(&mut self, data: &dyn DataPort, now: DateTime<Utc>) -> TickOutcome {
        match data.fetch_bars(&self.config.symbol) {
            Ok(bars) => self.tick(&bars, now),
            Err(e) => {
                warn!(symbol = %self.config.symbol, error = %e, "fetch failed, skipping tick");
                TickOutcome::DataUnavailable
            }
        }
    }
}
