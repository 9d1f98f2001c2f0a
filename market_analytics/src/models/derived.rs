//! Per-bar derived statistics.

use serde::Serialize;

/// Rolling statistics computed for one bar of a canonical series.
///
/// `None` means "not yet defined", never an error: the first bar has no
/// previous close to difference against, and the rolling statistics need a
/// full window of inputs before they carry meaning. Consumers treat an
/// absent value as "rule not evaluated".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DerivedPoint {
    /// Close-over-close percentage change. Absent for the first bar.
    pub return_pct: Option<f64>,

    /// Sample standard deviation of the last `window` returns
    /// (Bessel-corrected). Defined from index `window` onward.
    pub volatility: Option<f64>,

    /// Arithmetic mean of the last `window` volumes. Defined from index
    /// `window - 1` onward.
    pub volume_avg: Option<f64>,
}
