//! Session configuration port.
//!
//! Keys live under `[session]` and `[data]`. Typed getters fall back to the
//! caller's default when a key is absent or does not parse. Session loading
//! goes through `config_validation::read_value`, which rejects values that
//! are present but malformed.

pub trait ConfigPort {
    /// Trimmed value, or `None` when the key is missing or blank.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
