//! Time-to-live cache in front of another data port.
//!
//! Successful fetches are reused per symbol until the TTL elapses. Errors are
//! never cached, so the next tick retries the inner port.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::domain::error::BandtraderError;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::DataPort;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);

struct CacheEntry {
    fetched_at: Instant,
    bars: Vec<Bar>,
}

pub struct CachedDataAdapter<P: DataPort> {
    inner: P,
    ttl: Duration,
    entries: RefCell<HashMap<String, CacheEntry>>,
}

impl<P: DataPort> CachedDataAdapter<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RefCell::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    fn fetch_at(&self, symbol: &str, now: Instant) -> Result<Vec<Bar>, BandtraderError> {
        if let Some(entry) = self.entries.borrow().get(symbol) {
            if now.saturating_duration_since(entry.fetched_at) < self.ttl {
                debug!(symbol, bars = entry.bars.len(), "serving cached bars");
                return Ok(entry.bars.clone());
            }
        }

        let bars = self.inner.fetch_bars(symbol)?;
        self.entries.borrow_mut().insert(
            symbol.to_string(),
            CacheEntry {
                fetched_at: now,
                bars: bars.clone(),
            },
        );
        Ok(bars)
    }
}

impl<P: DataPort> DataPort for CachedDataAdapter<P> {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<Bar>, BandtraderError> {
        self.fetch_at(symbol, Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::cell::Cell;

    struct CountingPort {
        calls: Cell<usize>,
        fail: Cell<bool>,
    }

    impl CountingPort {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
                fail: Cell::new(false),
            }
        }
    }

    impl DataPort for CountingPort {
        fn fetch_bars(&self, _symbol: &str) -> Result<Vec<Bar>, BandtraderError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(BandtraderError::DataSource {
                    reason: "offline".into(),
                });
            }
            Ok(vec![Bar {
                timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 9, 15, 0).unwrap(),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.0,
                volume: self.calls.get() as u64,
            }])
        }
    }

    #[test]
    fn serves_from_cache_within_ttl() {
        let cache = CachedDataAdapter::new(CountingPort::new(), Duration::from_secs(30));
        let t0 = Instant::now();

        let first = cache.fetch_at("TCS.NS", t0).unwrap();
        let second = cache.fetch_at("TCS.NS", t0 + Duration::from_secs(29)).unwrap();

        assert_eq!(cache.inner().calls.get(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn refetches_after_ttl() {
        let cache = CachedDataAdapter::new(CountingPort::new(), Duration::from_secs(30));
        let t0 = Instant::now();

        cache.fetch_at("TCS.NS", t0).unwrap();
        let refreshed = cache.fetch_at("TCS.NS", t0 + Duration::from_secs(30)).unwrap();

        assert_eq!(cache.inner().calls.get(), 2);
        assert_eq!(refreshed[0].volume, 2);
    }

    #[test]
    fn symbols_are_cached_separately() {
        let cache = CachedDataAdapter::new(CountingPort::new(), DEFAULT_CACHE_TTL);
        let t0 = Instant::now();

        cache.fetch_at("TCS.NS", t0).unwrap();
        cache.fetch_at("INFY.NS", t0).unwrap();

        assert_eq!(cache.inner().calls.get(), 2);
    }

    #[test]
    fn errors_are_not_cached() {
        let cache = CachedDataAdapter::new(CountingPort::new(), DEFAULT_CACHE_TTL);
        let t0 = Instant::now();

        cache.inner().fail.set(true);
        assert!(cache.fetch_at("TCS.NS", t0).is_err());

        cache.inner().fail.set(false);
        assert!(cache.fetch_at("TCS.NS", t0).is_ok());
        assert_eq!(cache.inner().calls.get(), 2);
    }

    #[test]
    fn zero_ttl_never_caches() {
        let cache = CachedDataAdapter::new(CountingPort::new(), Duration::ZERO);
        let t0 = Instant::now();
        cache.fetch_at("TCS.NS", t0).unwrap();
        cache.fetch_at("TCS.NS", t0).unwrap();
        assert_eq!(cache.inner().calls.get(), 2);
    }
}
