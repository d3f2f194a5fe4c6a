//! Plain-text status report.
//!
//! Renders the same panels a dashboard would: portfolio metrics, current
//! status and signal, performance, recent transactions and market data.

use std::io::Write;

use crate::domain::engine::TickOutcome;
use crate::domain::error::BandtraderError;
use crate::domain::execution::OrderOutcome;
use crate::domain::session::Session;
use crate::domain::summary::{MarketSummary, PerformanceSummary};
use crate::ports::report_port::ReportPort;

/// Number of transactions listed in the recent-transactions panel.
pub const RECENT_TRANSACTIONS: usize = 10;

pub struct TextReportAdapter<W: Write> {
    out: W,
}

impl<W: Write> TextReportAdapter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn signal_line(outcome: &TickOutcome) -> Option<String> {
    let eval = outcome.evaluation()?;
    let signal = eval.signal?;
    let line = match &eval.order {
        Some(OrderOutcome::Filled(_)) => format!("{signal} signal detected, order filled"),
        Some(OrderOutcome::InsufficientFunds {
            required,
            available,
        }) => format!(
            "{signal} signal detected, order skipped (needs {required:.2}, cash {available:.2})"
        ),
        Some(OrderOutcome::InsufficientHoldings { required, held }) => format!(
            "{signal} signal detected, order skipped (needs {required} shares, holding {held})"
        ),
        None => format!("{signal} signal detected"),
    };
    Some(line)
}

impl<W: Write> TextReportAdapter<W> {
    fn render(&mut self, session: &Session, outcome: &TickOutcome) -> std::io::Result<()> {
        let config = session.config();
        let portfolio = session.portfolio();
        let out = &mut self.out;

        writeln!(out, "=== {} ({}) ===", config.symbol, session.params())?;

        if matches!(outcome, TickOutcome::DataUnavailable) {
            writeln!(out, "Unable to fetch data for {}", config.symbol)?;
            return Ok(());
        }

        let series = session.series();
        let current_price = series
            .and_then(|s| s.latest())
            .map(|b| b.bar.close)
            .unwrap_or(0.0);
        let perf = PerformanceSummary::compute(portfolio, current_price);

        writeln!(out, "Cash:             {:.2}", perf.cash)?;
        writeln!(out, "Holdings:         {} shares", perf.holdings)?;
        writeln!(out, "Holdings Value:   {:.2}", perf.holdings_value)?;
        writeln!(
            out,
            "Total Portfolio:  {:.2} ({:+.2})",
            perf.total_value, perf.profit_loss
        )?;

        writeln!(out, "\n--- Current Status ---")?;
        writeln!(out, "Position:         {}", perf.position)?;
        writeln!(out, "Current Price:    {:.2}", perf.current_price)?;
        if let TickOutcome::InsufficientHistory { bars } = outcome {
            writeln!(
                out,
                "Waiting for history: {} of {} bars",
                bars,
                session.params().period
            )?;
        }
        if let Some(line) = signal_line(outcome) {
            writeln!(out, "{line}")?;
        }
        if let Some(last) = &perf.last_trade {
            writeln!(
                out,
                "Last Trade:       {} {} @ {:.2}",
                last.side, last.quantity, last.price
            )?;
        }

        if !portfolio.valuations.is_empty() {
            writeln!(out, "\n--- Performance ---")?;
            writeln!(out, "P&L:              {:.2}%", perf.profit_loss_pct)?;
            writeln!(out, "Total Trades:     {}", perf.total_trades)?;
        }

        if !portfolio.transactions.is_empty() {
            writeln!(out, "\n--- Recent Transactions ---")?;
            let skip = portfolio
                .transactions
                .len()
                .saturating_sub(RECENT_TRANSACTIONS);
            for tx in &portfolio.transactions[skip..] {
                writeln!(
                    out,
                    "  {}  {:<4} {:>5} @ {:.2}",
                    tx.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    tx.side,
                    tx.quantity,
                    tx.price
                )?;
            }
        }

        if let Some(market) = series.and_then(MarketSummary::compute) {
            writeln!(out, "\n--- Market Data ---")?;
            writeln!(out, "Day High:         {:.2}", market.high)?;
            writeln!(out, "Day Low:          {:.2}", market.low)?;
            writeln!(out, "Volume:           {}", market.last_volume)?;
        }

        Ok(())
    }
}

impl<W: Write> ReportPort for TextReportAdapter<W> {
    fn write_status(
        &mut self,
        session: &Session,
        outcome: &TickOutcome,
    ) -> Result<(), BandtraderError> {
        self.render(session, outcome)?;
        self.out.flush()?;
        Ok(())
    }
}
