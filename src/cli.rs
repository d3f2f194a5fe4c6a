//! CLI definition and dispatch.

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::adapters::cached_data_adapter::{CachedDataAdapter, DEFAULT_CACHE_TTL};
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::ledger_export::export_ledger;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::config_validation::{
    DATA_SECTION, SESSION_SECTION, read_value, validate_session_config,
};
use crate::domain::engine::TickOutcome;
use crate::domain::error::BandtraderError;
use crate::domain::execution::OrderOutcome;
use crate::domain::session::{
    DEFAULT_INITIAL_CAPITAL, DEFAULT_ORDER_QUANTITY, DEFAULT_REFRESH_INTERVAL_SECS,
    DEFAULT_SYMBOL, DEFAULT_TRANSACTION_COST_PCT, Session, SessionConfig,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "bandtrader", about = "Bollinger Band paper-trading simulator")]
pub struct Cli {
    /// Log engine decisions at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Poll the data source and trade on every refresh
    Run {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,
        /// Rewrite the transaction log here after every tick
        #[arg(long)]
        ledger: Option<PathBuf>,
    },
    /// Reveal the symbol's bars one at a time, one tick per bar
    Replay {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        ledger: Option<PathBuf>,
    },
    /// Validate a session configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            symbol,
            ticks,
            ledger,
        } => run_live(&config, symbol.as_deref(), ticks, ledger.as_deref()),
        Command::Replay {
            config,
            symbol,
            ledger,
        } => run_replay(&config, symbol.as_deref(), ledger.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(err: BandtraderError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(&err)
}

/// Load and validate an INI file.
pub fn load_config(path: &Path) -> Result<FileConfigAdapter, BandtraderError> {
    info!(path = %path.display(), "loading config");
    let adapter = FileConfigAdapter::from_file(path)?;
    validate_session_config(&adapter)?;
    Ok(adapter)
}

fn session_int<T: TryFrom<i64>>(
    config: &dyn ConfigPort,
    key: &str,
    default: i64,
) -> Result<T, BandtraderError> {
    let value: i64 = read_value(config, SESSION_SECTION, key, default)?;
    T::try_from(value).map_err(|_| BandtraderError::ConfigInvalid {
        section: SESSION_SECTION.to_string(),
        key: key.to_string(),
        reason: format!("{value} is out of range"),
    })
}

pub fn build_session_config(
    config: &dyn ConfigPort,
    symbol_override: Option<&str>,
) -> Result<SessionConfig, BandtraderError> {
    let symbol = symbol_override
        .map(str::to_string)
        .or_else(|| config.get_string(SESSION_SECTION, "symbol"))
        .unwrap_or_else(|| DEFAULT_SYMBOL.to_string())
        .trim()
        .to_uppercase();

    let session = SessionConfig {
        symbol,
        refresh_interval_secs: session_int(
            config,
            "refresh_interval",
            DEFAULT_REFRESH_INTERVAL_SECS as i64,
        )?,
        order_quantity: session_int(config, "order_quantity", DEFAULT_ORDER_QUANTITY as i64)?,
        initial_capital: read_value(
            config,
            SESSION_SECTION,
            "initial_capital",
            DEFAULT_INITIAL_CAPITAL,
        )?,
        transaction_cost_pct: read_value(
            config,
            SESSION_SECTION,
            "transaction_cost",
            DEFAULT_TRANSACTION_COST_PCT,
        )?,
    };
    session.validate()?;
    Ok(session)
}

/// `[data] directory`, resolved against the config file's directory.
pub fn resolve_data_dir(config: &dyn ConfigPort, config_path: &Path) -> PathBuf {
    let base = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    match config.get_string(DATA_SECTION, "directory") {
        Some(dir) => base.join(dir),
        None => base,
    }
}

pub fn cache_ttl(config: &dyn ConfigPort) -> Duration {
    if !config.get_bool(DATA_SECTION, "cache", true) {
        return Duration::ZERO;
    }
    let secs = config.get_int(DATA_SECTION, "cache_ttl", DEFAULT_CACHE_TTL.as_secs() as i64);
    Duration::from_secs(u64::try_from(secs).unwrap_or(0))
}

fn describe(outcome: &TickOutcome) -> Option<String> {
    let eval = outcome.evaluation()?;
    let signal = eval.signal?;
    let status = match &eval.order {
        Some(OrderOutcome::Filled(_)) => "filled",
        Some(OrderOutcome::InsufficientFunds { .. }) => "skipped: insufficient funds",
        Some(OrderOutcome::InsufficientHoldings { .. }) => "skipped: insufficient holdings",
        None => "no order",
    };
    Some(format!("{signal} @ {:.2} ({status})", eval.price))
}

fn export(session: &Session, ledger: Option<&Path>) -> Result<(), BandtraderError> {
    if let Some(path) = ledger {
        export_ledger(session.portfolio(), path)?;
        debug!(path = %path.display(), "ledger written");
    }
    Ok(())
}

pub fn run_live(
    config_path: &Path,
    symbol: Option<&str>,
    ticks: Option<u64>,
    ledger: Option<&Path>,
) -> ExitCode {
    match live_session(config_path, symbol, ticks, ledger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

fn live_session(
    config_path: &Path,
    symbol: Option<&str>,
    ticks: Option<u64>,
    ledger: Option<&Path>,
) -> Result<(), BandtraderError> {
    let adapter = load_config(config_path)?;
    let session_config = build_session_config(&adapter, symbol)?;
    let interval = Duration::from_secs(session_config.refresh_interval_secs);

    let data = CachedDataAdapter::new(
        CsvAdapter::new(resolve_data_dir(&adapter, config_path)),
        cache_ttl(&adapter),
    );
    let mut session = Session::new(session_config);
    let mut report = TextReportAdapter::new(std::io::stdout().lock());

    info!(
        symbol = %session.config().symbol,
        refresh_secs = interval.as_secs(),
        "session started"
    );

    let mut tick = 0u64;
    loop {
        tick += 1;
        let outcome = session.tick_from(&data, Utc::now());
        if let Some(line) = describe(&outcome) {
            info!(tick, "{line}");
        }
        report.write_status(&session, &outcome)?;
        export(&session, ledger)?;

        if ticks.is_some_and(|limit| tick >= limit) {
            return Ok(());
        }
        std::thread::sleep(interval);
    }
}

pub fn run_replay(config_path: &Path, symbol: Option<&str>, ledger: Option<&Path>) -> ExitCode {
    match replay_session(config_path, symbol, ledger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

/// Replays the symbol's bars as if they arrived one per refresh.
///
/// Each tick is stamped with the newest revealed bar's timestamp, so a replay
/// is deterministic.
pub fn replay(
    data: &dyn DataPort,
    session: &mut Session,
) -> Result<Vec<TickOutcome>, BandtraderError> {
    let bars = data.fetch_bars(&session.config().symbol)?;
    if bars.is_empty() {
        return Err(BandtraderError::NoData {
            symbol: session.config().symbol.clone(),
        });
    }

    let mut outcomes = Vec::with_capacity(bars.len());
    for end in 1..=bars.len() {
        let revealed = &bars[..end];
        let now = revealed[end - 1].timestamp;
        let outcome = session.tick(revealed, now);
        if let Some(line) = describe(&outcome) {
            println!("{}  {}", now.format("%Y-%m-%d %H:%M:%S"), line);
        }
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

fn replay_session(
    config_path: &Path,
    symbol: Option<&str>,
    ledger: Option<&Path>,
) -> Result<(), BandtraderError> {
    let adapter = load_config(config_path)?;
    let session_config = build_session_config(&adapter, symbol)?;
    let data = CsvAdapter::new(resolve_data_dir(&adapter, config_path));
    let mut session = Session::new(session_config);

    let outcomes = replay(&data, &mut session)?;
    let trades = session.portfolio().trade_count();
    info!(ticks = outcomes.len(), trades, "replay finished");
    if trades == 0 {
        warn!("replay produced no trades");
    }

    let mut report = TextReportAdapter::new(std::io::stdout().lock());
    if let Some(last) = outcomes.last() {
        report.write_status(&session, last)?;
    }

    export(&session, ledger)
}

pub fn run_validate(config_path: &Path) -> ExitCode {
    let result = load_config(config_path).and_then(|adapter| build_session_config(&adapter, None));
    match result {
        Ok(config) => {
            eprintln!("Config validated successfully");
            eprintln!("  Symbol:           {}", config.symbol);
            eprintln!("  Refresh interval: {}s", config.refresh_interval_secs);
            eprintln!("  Order quantity:   {}", config.order_quantity);
            eprintln!("  Initial capital:  {:.2}", config.initial_capital);
            eprintln!("  Transaction cost: {}%", config.transaction_cost_pct);
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}
