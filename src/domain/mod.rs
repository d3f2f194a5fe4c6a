//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod signal;
pub mod portfolio;
pub mod execution;
pub mod engine;
pub mod session;
pub mod summary;
pub mod config_validation;
pub mod error;
