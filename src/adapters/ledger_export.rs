//! CSV export of the transaction log and valuation history.

use std::io::Write;
use std::path::Path;

use crate::domain::error::BandtraderError;
use crate::domain::portfolio::{Portfolio, Transaction, ValuationSnapshot};

fn csv_error(e: csv::Error) -> BandtraderError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => BandtraderError::Io(io),
        other => BandtraderError::Io(std::io::Error::other(format!("{other:?}"))),
    }
}

pub fn write_transactions<W: Write>(
    out: W,
    transactions: &[Transaction],
) -> Result<(), BandtraderError> {
    let mut wtr = csv::Writer::from_writer(out);
    for tx in transactions {
        wtr.serialize(tx).map_err(csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_valuations<W: Write>(
    out: W,
    valuations: &[ValuationSnapshot],
) -> Result<(), BandtraderError> {
    let mut wtr = csv::Writer::from_writer(out);
    for snapshot in valuations {
        wtr.serialize(snapshot).map_err(csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `<stem>.csv` with transactions and `<stem>_valuations.csv` beside it.
pub fn export_ledger(portfolio: &Portfolio, path: &Path) -> Result<(), BandtraderError> {
    let file = std::fs::File::create(path)?;
    write_transactions(file, &portfolio.transactions)?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ledger".to_string());
    let valuations_path = path.with_file_name(format!("{stem}_valuations.csv"));
    let file = std::fs::File::create(valuations_path)?;
    write_valuations(file, &portfolio.valuations)?;
    Ok(())
}
