//! CSV file data adapter.
//!
//! Reads `<base>/<SYMBOL>.csv` with columns
//! `timestamp,open,high,low,close,volume`. Timestamps are RFC 3339 or
//! `%Y-%m-%d %H:%M:%S` (taken as UTC).

use crate::domain::error::BandtraderError;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::DataPort;
use chrono::{DateTime, NaiveDateTime, Utc};
use csv::StringRecord;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, BandtraderError> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| BandtraderError::DataSource {
            reason: format!("invalid timestamp '{}': {}", value, e),
        })
}

fn field<'a>(
    record: &'a StringRecord,
    index: usize,
    name: &str,
) -> Result<&'a str, BandtraderError> {
    record.get(index).ok_or_else(|| BandtraderError::DataSource {
        reason: format!("missing {} column", name),
    })
}

fn price(record: &StringRecord, index: usize, name: &str) -> Result<f64, BandtraderError> {
    field(record, index, name)?
        .trim()
        .parse()
        .map_err(|e| BandtraderError::DataSource {
            reason: format!("invalid {} value: {}", name, e),
        })
}

pub fn parse_record(record: &StringRecord) -> Result<Bar, BandtraderError> {
    let timestamp = parse_timestamp(field(record, 0, "timestamp")?)?;
    let volume: u64 = field(record, 5, "volume")?
        .trim()
        .parse()
        .map_err(|e| BandtraderError::DataSource {
            reason: format!("invalid volume value: {}", e),
        })?;

    Ok(Bar {
        timestamp,
        open: price(record, 1, "open")?,
        high: price(record, 2, "high")?,
        low: price(record, 3, "low")?,
        close: price(record, 4, "close")?,
        volume,
    })
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<Bar>, BandtraderError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| BandtraderError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| BandtraderError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;
            bars.push(parse_record(&record)?);
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, symbol: &str, content: &str) {
        let path = dir.path().join(format!("{}.csv", symbol));
        let mut file = fs::File::create(path).unwrap();
        write!(file, "{}", content).unwrap();
    }

    #[test]
    fn reads_and_sorts_bars() {
        let dir = TempDir::new().unwrap();
        write_csv(
            &dir,
            "TCS.NS",
            "timestamp,open,high,low,close,volume\n\
             2024-01-15 09:16:00,101,102,100,101.5,1200\n\
             2024-01-15T09:15:00+05:30,100,101,99,100.5,1000\n",
        );
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let bars = adapter.fetch_bars("TCS.NS").unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(
            bars[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 15, 3, 45, 0).unwrap()
        );
        assert!((bars[0].close - 100.5).abs() < f64::EPSILON);
        assert_eq!(bars[1].volume, 1200);
    }

    #[test]
    fn header_only_file_is_empty() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "EMPTY", "timestamp,open,high,low,close,volume\n");
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        assert!(adapter.fetch_bars("EMPTY").unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_data_source_error() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let err = adapter.fetch_bars("NOPE").unwrap_err();
        assert!(matches!(err, BandtraderError::DataSource { .. }));
    }

    #[test]
    fn invalid_price_is_error() {
        let dir = TempDir::new().unwrap();
        write_csv(
            &dir,
            "BAD",
            "timestamp,open,high,low,close,volume\n2024-01-15 09:15:00,abc,1,1,1,1\n",
        );
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let err = adapter.fetch_bars("BAD").unwrap_err();
        assert!(err.to_string().contains("invalid open value"));
    }

    #[test]
    fn invalid_timestamp_is_error() {
        let err = parse_timestamp("15/01/2024").unwrap_err();
        assert!(err.to_string().contains("invalid timestamp"));
    }

    #[test]
    fn csv_path_uses_symbol() {
        let adapter = CsvAdapter::new(PathBuf::from("/data"));
        assert_eq!(adapter.csv_path("AAPL"), PathBuf::from("/data/AAPL.csv"));
    }
}
