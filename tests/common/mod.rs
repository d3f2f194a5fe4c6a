#![allow(dead_code)]

use bandtrader::domain::error::BandtraderError;
pub use bandtrader::domain::ohlcv::Bar;
use bandtrader::domain::session::SessionConfig;
use bandtrader::ports::data_port::DataPort;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::cell::Cell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
    pub calls: Cell<usize>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: Cell::new(0),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<Bar>, BandtraderError> {
        self.calls.set(self.calls.get() + 1);
        if let Some(reason) = self.errors.get(symbol) {
            return Err(BandtraderError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }
}

pub fn session_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 9, 15, 0).unwrap()
}

pub fn minute(i: usize) -> DateTime<Utc> {
    session_start() + Duration::minutes(i as i64)
}

pub fn make_bar(i: usize, low: f64, high: f64, close: f64) -> Bar {
    Bar {
        timestamp: minute(i),
        open: close,
        high,
        low,
        close,
        volume: 1_000,
    }
}

pub fn flat_bars(count: usize, price: f64) -> Vec<Bar> {
    (0..count).map(|i| make_bar(i, price, price, price)).collect()
}

/// Bars whose closes follow `closes`, with a one-unit range around each close.
pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(i, c - 1.0, c + 1.0, c))
        .collect()
}

/// Session config where r = 0.05 (5%), matching the worked examples.
pub fn scenario_config(initial_capital: f64) -> SessionConfig {
    SessionConfig {
        symbol: "TCS.NS".into(),
        refresh_interval_secs: 60,
        order_quantity: 10,
        initial_capital,
        transaction_cost_pct: 5.0,
    }
}
