//! Domain error types.
//!
//! Guard failures and missing data are not errors: the engine reports them as
//! no-op outcomes. Only configuration and I/O problems surface here.

/// Top-level error type for bandtrader.
#[derive(Debug, thiserror::Error)]
pub enum BandtraderError {
    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&BandtraderError> for std::process::ExitCode {
    fn from(err: &BandtraderError) -> Self {
        let code: u8 = match err {
            BandtraderError::Io(_) => 1,
            BandtraderError::ConfigParse { .. } | BandtraderError::ConfigInvalid { .. } => 2,
            BandtraderError::DataSource { .. } => 3,
            BandtraderError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
