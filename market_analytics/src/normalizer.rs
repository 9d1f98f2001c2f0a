//! Converts raw provider records into a canonical, validated series.
//!
//! Unusable rows are dropped and counted, never repaired: a silently "fixed"
//! bar would corrupt every rolling statistic downstream. The whole batch
//! fails only when the dropped fraction exceeds the configured quality
//! threshold.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use market_data_source::models::{interval::Interval, raw::RawBarRecord};
use thiserror::Error;
use tracing::debug;

use crate::{
    errors::{DataQualityError, InternalInvariantError},
    models::{
        bar::{Bar, InvalidBarError},
        series::Series,
    },
    time,
};

/// Per-reason accounting of rows discarded during normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropCounts {
    /// Timestamp matched no accepted format or named a nonexistent instant.
    pub bad_timestamp: usize,
    /// A price or volume field failed numeric coercion.
    pub bad_number: usize,
    /// Prices parsed but violated OHLC consistency.
    pub inconsistent_ohlc: usize,
}

impl DropCounts {
    /// Total rows dropped for any reason.
    pub fn total(&self) -> usize {
        self.bad_timestamp + self.bad_number + self.inconsistent_ohlc
    }
}

/// A canonical series plus the accounting for rows that did not make it.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBatch {
    /// The cleaned, sorted, deduplicated series.
    pub series: Series,
    /// Rows in the incoming batch.
    pub rows_seen: usize,
    /// Rows discarded, by reason.
    pub dropped: DropCounts,
}

/// Failure modes of [`normalize`].
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Too many rows were dropped; the batch is unusable.
    #[error(transparent)]
    Quality(#[from] DataQualityError),

    /// The cleaned rows still violated series ordering; a normalizer defect.
    #[error(transparent)]
    Invariant(#[from] InternalInvariantError),
}

/// Cleans one batch of raw records into a canonical [`Series`].
///
/// Rules, applied per row:
/// - unparsable timestamps drop the row;
/// - numeric coercion failures drop the row;
/// - OHLC-inconsistent rows are dropped, not adjusted;
/// - duplicate timestamps keep the LAST occurrence (providers resend
///   partial bars);
/// - survivors are sorted ascending.
///
/// Fails with [`DataQualityError`] when the dropped fraction of a non-empty
/// batch exceeds `quality_drop_threshold`. Never mutates its input.
pub fn normalize(
    symbol: &str,
    interval: Interval,
    records: &[RawBarRecord],
    quality_drop_threshold: f64,
) -> Result<NormalizedBatch, NormalizeError> {
    let mut dropped = DropCounts::default();
    let mut by_timestamp: BTreeMap<DateTime<Utc>, Bar> = BTreeMap::new();

    for record in records {
        let Some(timestamp) = time::parse_provider_timestamp(&record.timestamp) else {
            dropped.bad_timestamp += 1;
            debug!(raw = %record.timestamp, "dropping row with unparsable timestamp");
            continue;
        };

        let prices = [
            parse_price(&record.open),
            parse_price(&record.high),
            parse_price(&record.low),
            parse_price(&record.close),
        ];
        let [Some(open), Some(high), Some(low), Some(close)] = prices else {
            dropped.bad_number += 1;
            debug!(%timestamp, "dropping row with uncoercible price field");
            continue;
        };
        let Some(volume) = parse_volume(&record.volume) else {
            dropped.bad_number += 1;
            debug!(%timestamp, raw = %record.volume, "dropping row with uncoercible volume");
            continue;
        };

        match Bar::new(timestamp, open, high, low, close, volume) {
            Ok(bar) => {
                // Keep-last dedup: a resent bar replaces the earlier partial.
                by_timestamp.insert(timestamp, bar);
            }
            Err(InvalidBarError::NonPositivePrice { field, value }) => {
                dropped.bad_number += 1;
                debug!(%timestamp, field, value, "dropping row with non-positive price");
            }
            Err(reason) => {
                dropped.inconsistent_ohlc += 1;
                debug!(%timestamp, %reason, "dropping OHLC-inconsistent row");
            }
        }
    }

    let rows_seen = records.len();
    let total_dropped = dropped.total();
    if rows_seen > 0 && total_dropped as f64 / rows_seen as f64 > quality_drop_threshold {
        return Err(DataQualityError {
            seen: rows_seen,
            dropped: total_dropped,
            threshold: quality_drop_threshold,
        }
        .into());
    }

    let series = Series::from_bars(symbol, interval, by_timestamp.into_values().collect())?;

    Ok(NormalizedBatch {
        series,
        rows_seen,
        dropped,
    })
}

fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Volume must be a non-negative integer; integer-valued floats ("2500.0")
/// are tolerated because some vendors emit them.
fn parse_volume(raw: &str) -> Option<u64> {
    let value = raw.trim();
    if let Ok(volume) = value.parse::<u64>() {
        return Some(volume);
    }
    let as_float = value.parse::<f64>().ok()?;
    if as_float.is_finite() && as_float >= 0.0 && as_float.fract() == 0.0 {
        Some(as_float as u64)
    } else {
        None
    }
}
