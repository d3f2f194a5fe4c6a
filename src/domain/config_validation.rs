//! Configuration validation.
//!
//! Validates session fields before a session starts. Missing keys fall back
//! to the session defaults; present keys must parse and be within range.

use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::domain::error::BandtraderError;
use crate::domain::session::{
    DEFAULT_INITIAL_CAPITAL, DEFAULT_ORDER_QUANTITY, DEFAULT_REFRESH_INTERVAL_SECS,
    DEFAULT_SYMBOL, DEFAULT_TRANSACTION_COST_PCT, SessionConfig,
};
use crate::ports::config_port::ConfigPort;

pub const SESSION_SECTION: &str = "session";
pub const DATA_SECTION: &str = "data";

pub const REFRESH_INTERVAL_RANGE: RangeInclusive<i64> = 10..=300;
pub const ORDER_QUANTITY_RANGE: RangeInclusive<i64> = 1..=1000;
pub const INITIAL_CAPITAL_RANGE: RangeInclusive<f64> = 1_000.0..=10_000_000.0;
pub const TRANSACTION_COST_RANGE: RangeInclusive<f64> = 0.01..=1.0;

pub const DEFAULT_CACHE_TTL_SECS: i64 = 30;

pub fn validate_session_config(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    validate_symbol(config.get_string(SESSION_SECTION, "symbol").as_deref())?;

    let refresh: i64 = read_value(
        config,
        SESSION_SECTION,
        "refresh_interval",
        DEFAULT_REFRESH_INTERVAL_SECS as i64,
    )?;
    check_int("refresh_interval", refresh, REFRESH_INTERVAL_RANGE)?;

    let quantity: i64 = read_value(
        config,
        SESSION_SECTION,
        "order_quantity",
        DEFAULT_ORDER_QUANTITY as i64,
    )?;
    check_int("order_quantity", quantity, ORDER_QUANTITY_RANGE)?;

    let capital: f64 = read_value(
        config,
        SESSION_SECTION,
        "initial_capital",
        DEFAULT_INITIAL_CAPITAL,
    )?;
    check_float("initial_capital", capital, INITIAL_CAPITAL_RANGE)?;

    let cost: f64 = read_value(
        config,
        SESSION_SECTION,
        "transaction_cost",
        DEFAULT_TRANSACTION_COST_PCT,
    )?;
    check_float("transaction_cost", cost, TRANSACTION_COST_RANGE)?;

    validate_data_section(config)
}

/// Parse `[section] key`. Only an absent key falls back to `default`; a
/// present value that does not parse is rejected.
pub fn read_value<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: T,
) -> Result<T, BandtraderError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| BandtraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("'{raw}' is not a number"),
        }),
    }
}

/// Range checks for a session built in code rather than read from a file.
pub fn validate_session(config: &SessionConfig) -> Result<(), BandtraderError> {
    validate_symbol(Some(&config.symbol))?;
    check_int(
        "refresh_interval",
        i64::try_from(config.refresh_interval_secs).unwrap_or(i64::MAX),
        REFRESH_INTERVAL_RANGE,
    )?;
    check_int(
        "order_quantity",
        config.order_quantity as i64,
        ORDER_QUANTITY_RANGE,
    )?;
    check_float(
        "initial_capital",
        config.initial_capital,
        INITIAL_CAPITAL_RANGE,
    )?;
    check_float(
        "transaction_cost",
        config.transaction_cost_pct,
        TRANSACTION_COST_RANGE,
    )?;
    Ok(())
}

fn validate_symbol(value: Option<&str>) -> Result<(), BandtraderError> {
    let symbol = value.unwrap_or(DEFAULT_SYMBOL);
    if symbol.trim().is_empty() {
        return Err(invalid("symbol", "symbol must not be empty".to_string()));
    }
    Ok(())
}

fn validate_data_section(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    let ttl: i64 = read_value(config, DATA_SECTION, "cache_ttl", DEFAULT_CACHE_TTL_SECS)?;
    if ttl < 0 {
        return Err(BandtraderError::ConfigInvalid {
            section: DATA_SECTION.to_string(),
            key: "cache_ttl".to_string(),
            reason: "cache_ttl must be non-negative".to_string(),
        });
    }

    // a flag that reads differently under both defaults did not parse
    if config.get_string(DATA_SECTION, "cache").is_some()
        && config.get_bool(DATA_SECTION, "cache", true)
            != config.get_bool(DATA_SECTION, "cache", false)
    {
        return Err(BandtraderError::ConfigInvalid {
            section: DATA_SECTION.to_string(),
            key: "cache".to_string(),
            reason: "expected true or false".to_string(),
        });
    }
    Ok(())
}

fn check_int(key: &str, value: i64, range: RangeInclusive<i64>) -> Result<(), BandtraderError> {
    if !range.contains(&value) {
        return Err(invalid(
            key,
            format!(
                "{} must be between {} and {}",
                key,
                range.start(),
                range.end()
            ),
        ));
    }
    Ok(())
}

fn check_float(key: &str, value: f64, range: RangeInclusive<f64>) -> Result<(), BandtraderError> {
    if !range.contains(&value) {
        return Err(invalid(
            key,
            format!(
                "{} must be between {} and {}",
                key,
                range.start(),
                range.end()
            ),
        ));
    }
    Ok(())
}

fn invalid(key: &str, reason: String) -> BandtraderError {
    BandtraderError::ConfigInvalid {
        section: SESSION_SECTION.to_string(),
        key: key.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MockConfig {
        data: HashMap<(String, String), String>,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                data: HashMap::new(),
            }
        }

        fn set(mut self, section: &str, key: &str, value: &str) -> Self {
            self.data
                .insert((section.to_string(), key.to_string()), value.to_string());
            self
        }
    }

    impl ConfigPort for MockConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.data
                .get(&(section.to_string(), key.to_string()))
                .cloned()
        }

        fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
            match self.get_string(section, key).as_deref() {
                Some("true") => true,
                Some("false") => false,
                _ => default,
            }
        }
    }

    fn valid_config() -> MockConfig {
        MockConfig::new()
            .set("session", "symbol", "TCS.NS")
            .set("session", "refresh_interval", "60")
            .set("session", "order_quantity", "10")
            .set("session", "initial_capital", "10000")
            .set("session", "transaction_cost", "0.05")
    }

    fn invalid_key(result: Result<(), BandtraderError>) -> String {
        match result {
            Err(BandtraderError::ConfigInvalid { key, .. }) => key,
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn valid_session_passes() {
        assert!(validate_session_config(&valid_config()).is_ok());
    }

    #[test]
    fn empty_config_uses_defaults() {
        assert!(validate_session_config(&MockConfig::new()).is_ok());
    }

    #[test]
    fn blank_symbol_rejected() {
        let config = valid_config().set("session", "symbol", "  ");
        assert_eq!(invalid_key(validate_session_config(&config)), "symbol");
    }

    #[test]
    fn refresh_interval_bounds() {
        let low = valid_config().set("session", "refresh_interval", "9");
        assert_eq!(invalid_key(validate_session_config(&low)), "refresh_interval");

        let high = valid_config().set("session", "refresh_interval", "301");
        assert_eq!(invalid_key(validate_session_config(&high)), "refresh_interval");

        let edge = valid_config().set("session", "refresh_interval", "300");
        assert!(validate_session_config(&edge).is_ok());
    }

    #[test]
    fn zero_order_quantity_rejected() {
        let config = valid_config().set("session", "order_quantity", "0");
        assert_eq!(invalid_key(validate_session_config(&config)), "order_quantity");
    }

    #[test]
    fn initial_capital_bounds() {
        let low = valid_config().set("session", "initial_capital", "999.99");
        assert_eq!(invalid_key(validate_session_config(&low)), "initial_capital");

        let negative = valid_config().set("session", "initial_capital", "-5");
        assert_eq!(invalid_key(validate_session_config(&negative)), "initial_capital");
    }

    #[test]
    fn transaction_cost_bounds() {
        let low = valid_config().set("session", "transaction_cost", "0.001");
        assert_eq!(invalid_key(validate_session_config(&low)), "transaction_cost");

        let high = valid_config().set("session", "transaction_cost", "1.5");
        assert_eq!(invalid_key(validate_session_config(&high)), "transaction_cost");

        let edge = valid_config().set("session", "transaction_cost", "1.0");
        assert!(validate_session_config(&edge).is_ok());
    }

    #[test]
    fn negative_cache_ttl_rejected() {
        let config = valid_config().set("data", "cache_ttl", "-1");
        match validate_session_config(&config) {
            Err(BandtraderError::ConfigInvalid { section, key, .. }) => {
                assert_eq!(section, "data");
                assert_eq!(key, "cache_ttl");
            }
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_numbers_rejected() {
        for (key, raw) in [
            ("order_quantity", "ten"),
            ("initial_capital", "5k"),
            ("refresh_interval", "45.5"),
            ("transaction_cost", "0,5"),
        ] {
            let config = valid_config().set("session", key, raw);
            assert_eq!(invalid_key(validate_session_config(&config)), key);
        }
    }

    #[test]
    fn read_value_falls_back_only_when_absent() {
        let config = valid_config();
        assert_eq!(read_value(&config, "session", "order_quantity", 1i64).unwrap(), 10);
        assert_eq!(read_value(&config, "session", "missing", 7i64).unwrap(), 7);

        let bad = valid_config().set("session", "initial_capital", "lots");
        match read_value(&bad, "session", "initial_capital", 0.0f64) {
            Err(BandtraderError::ConfigInvalid { reason, .. }) => {
                assert!(reason.contains("not a number"));
            }
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_cache_settings_rejected() {
        let ttl = valid_config().set("data", "cache_ttl", "soon");
        match validate_session_config(&ttl) {
            Err(BandtraderError::ConfigInvalid { section, key, .. }) => {
                assert_eq!(section, "data");
                assert_eq!(key, "cache_ttl");
            }
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }

        let flag = valid_config().set("data", "cache", "maybe");
        match validate_session_config(&flag) {
            Err(BandtraderError::ConfigInvalid { key, .. }) => assert_eq!(key, "cache"),
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }

        let on = valid_config().set("data", "cache", "true");
        assert!(validate_session_config(&on).is_ok());
    }

    #[test]
    fn typed_session_validation() {
        assert!(validate_session(&SessionConfig::default()).is_ok());

        let bad = SessionConfig {
            order_quantity: 0,
            ..SessionConfig::default()
        };
        assert_eq!(invalid_key(validate_session(&bad)), "order_quantity");

        let bad_refresh = SessionConfig {
            refresh_interval_secs: 5,
            ..SessionConfig::default()
        };
        assert_eq!(invalid_key(validate_session(&bad_refresh)), "refresh_interval");
    }
}
