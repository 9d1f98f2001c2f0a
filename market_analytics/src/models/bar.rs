//! Canonical in-memory representation of a time-series bar (OHLCV).

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// A row failed the bar validity rules and must be dropped, not repaired.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidBarError {
    /// A price field is zero, negative, NaN or infinite.
    #[error("{field} must be a positive finite number, got {value}")]
    NonPositivePrice { field: &'static str, value: f64 },

    /// `high` is below another price of the same bar.
    #[error("high {high} is below max(open, close, low) = {bound}")]
    HighBelowRange { high: f64, bound: f64 },

    /// `low` is above another price of the same bar.
    #[error("low {low} is above min(open, close, high) = {bound}")]
    LowAboveRange { low: f64, bound: f64 },
}

/// A single validated time-series bar (OHLCV) for a given timestamp.
///
/// Constructed only through [`Bar::new`], which enforces positive finite
/// prices and OHLC consistency (`high >= max(open, close, low)`,
/// `low <= min(open, close, high)`). Once built a bar is never mutated;
/// the owning [`Series`](crate::models::series::Series) hands out shared
/// references only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    /// The timestamp for this bar (UTC).
    pub timestamp: DateTime<Utc>,

    /// Opening price.
    pub open: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Volume traded during the bar interval.
    pub volume: u64,
}

impl Bar {
    /// Builds a bar, rejecting rows that violate the validity rules.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, InvalidBarError> {
        for (field, value) in [("open", open), ("high", high), ("low", low), ("close", close)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(InvalidBarError::NonPositivePrice { field, value });
            }
        }

        let upper = open.max(close).max(low);
        if high < upper {
            return Err(InvalidBarError::HighBelowRange { high, bound: upper });
        }

        let lower = open.min(close).min(high);
        if low > lower {
            return Err(InvalidBarError::LowAboveRange { low, bound: lower });
        }

        Ok(Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}
