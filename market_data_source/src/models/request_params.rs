//! Universal request parameters for intraday bar data.

use serde::{Deserialize, Serialize};

use crate::models::interval::Interval;

/// Parameters for requesting one symbol's intraday bars from any provider.
///
/// Vendor-agnostic: each [`DataProvider`](crate::providers::DataProvider)
/// implementation translates these into its own query format and applies its
/// own validation rules (e.g. which month slices the vendor can serve).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarsRequestParams {
    /// The instrument symbol to request (e.g. `"AAPL"`).
    pub symbol: String,

    /// The time interval for each bar.
    pub interval: Interval,

    /// Optional month slice in `"YYYY-MM"` form.
    ///
    /// `None` asks the provider for its most recent data. Validation of the
    /// format is provider-side; the string is passed through untouched.
    #[serde(default)]
    pub month: Option<String>,
}
