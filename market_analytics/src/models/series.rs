//! Append-only canonical series for one (symbol, interval) pair.

use chrono::{DateTime, Utc};
use market_data_source::models::interval::Interval;
use serde::Serialize;

use crate::{errors::InternalInvariantError, models::bar::Bar};

/// The cleaned, ordered bar sequence for one (symbol, interval) pair.
///
/// Timestamps are strictly increasing and unique. The series is extended
/// monotonically only: [`Series::append`] accepts a bar strictly newer than
/// the current last bar and nothing else. Inserting, reordering or
/// overwriting committed bars is impossible through this API, which keeps
/// downstream rolling statistics reproducible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    symbol: String,
    interval: Interval,
    bars: Vec<Bar>,
}

impl Series {
    /// Creates an empty series. The symbol must be non-empty; the pipeline
    /// validates that at construction, so this only debug-asserts it.
    pub fn new(symbol: impl Into<String>, interval: Interval) -> Self {
        let symbol = symbol.into();
        debug_assert!(!symbol.is_empty());
        Self {
            symbol,
            interval,
            bars: Vec::new(),
        }
    }

    /// Builds a series from bars that are expected to already be sorted and
    /// deduplicated, verifying the ordering invariant instead of assuming it.
    pub fn from_bars(
        symbol: impl Into<String>,
        interval: Interval,
        bars: Vec<Bar>,
    ) -> Result<Self, InternalInvariantError> {
        let mut series = Series::new(symbol, interval);
        for bar in bars {
            series.append(bar)?;
        }
        Ok(series)
    }

    /// Appends a bar strictly newer than the current last bar.
    pub fn append(&mut self, bar: Bar) -> Result<(), InternalInvariantError> {
        if let Some(last) = self.bars.last()
            && bar.timestamp <= last.timestamp
        {
            return Err(InternalInvariantError(format!(
                "non-monotonic append to {}: {} does not follow {}",
                self.symbol, bar.timestamp, last.timestamp
            )));
        }
        self.bars.push(bar);
        Ok(())
    }

    /// The instrument symbol this series describes.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The sampling interval of every bar in the series.
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// The committed bars, ascending by timestamp.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Number of committed bars.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// True when no bar has been committed yet.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Timestamp of the newest committed bar, if any.
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.bars.last().map(|bar| bar.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(minute: u32) -> Bar {
        let stamp = Utc.with_ymd_and_hms(2024, 3, 8, 14, minute, 0).unwrap();
        Bar::new(stamp, 100.0, 101.0, 99.0, 100.5, 1_000).unwrap()
    }

    #[test]
    fn append_keeps_ascending_order() {
        let mut series = Series::new("AAPL", Interval::Min1);
        series.append(bar(30)).unwrap();
        series.append(bar(31)).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.last_timestamp(), Some(bar(31).timestamp));
    }

    #[test]
    fn stale_append_is_rejected() {
        let mut series = Series::new("AAPL", Interval::Min1);
        series.append(bar(30)).unwrap();
        assert!(series.append(bar(30)).is_err());
        assert!(series.append(bar(29)).is_err());
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn from_bars_verifies_ordering() {
        assert!(Series::from_bars("AAPL", Interval::Min1, vec![bar(30), bar(31)]).is_ok());
        assert!(Series::from_bars("AAPL", Interval::Min1, vec![bar(31), bar(30)]).is_err());
    }
}
