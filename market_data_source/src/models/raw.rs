//! Provider-native bar records, prior to any normalization.

use serde::{Deserialize, Serialize};

/// One raw row exactly as the provider emitted it.
///
/// Every field is kept as a string: providers disagree on timestamp formats
/// and send numbers as quoted strings, and coercing here would hide data
/// quality problems from the normalizer's accounting. The analytics side
/// owns all parsing, validation and drop decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBarRecord {
    /// Timestamp as spelled by the provider (format varies by vendor).
    pub timestamp: String,
    /// Opening price, unparsed.
    pub open: String,
    /// High price, unparsed.
    pub high: String,
    /// Low price, unparsed.
    pub low: String,
    /// Closing price, unparsed.
    pub close: String,
    /// Traded volume, unparsed.
    pub volume: String,
}
