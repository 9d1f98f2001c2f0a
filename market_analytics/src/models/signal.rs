//! Signal classifications attached to bars.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Classification kinds, listed in alerting priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SignalKind {
    /// Volume exceeded its rolling baseline by the configured multiplier.
    VolumeSpike,
    /// Absolute return exceeded the configured multiple of rolling volatility.
    PriceAnomaly,
    /// The tracked trend flipped upward on this bar.
    TrendUp,
    /// The tracked trend flipped downward on this bar.
    TrendDown,
    /// Nothing noteworthy.
    Normal,
}

impl SignalKind {
    /// Stable lowercase name for logs and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::VolumeSpike => "volume_spike",
            SignalKind::PriceAnomaly => "price_anomaly",
            SignalKind::TrendUp => "trend_up",
            SignalKind::TrendDown => "trend_down",
            SignalKind::Normal => "normal",
        }
    }
}

/// One classification with its severity score.
///
/// Severity is rule-specific: volume ratio for spikes, sigma multiple for
/// anomalies, run length for trend flips, zero for `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub severity: f64,
}

/// All signals attached to one bar.
///
/// `signals` is never empty and holds at most one entry per kind, ordered by
/// rule priority; the first entry is the dominant signal used for alerting.
/// A bar matching no rule carries a single `Normal` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarClassification {
    /// Index of the bar within its series.
    pub index: usize,
    /// Timestamp of the classified bar.
    pub timestamp: DateTime<Utc>,
    /// Matched signals, dominant first.
    pub signals: Vec<Signal>,
}

impl BarClassification {
    /// The highest-priority signal for this bar.
    pub fn dominant(&self) -> &Signal {
        // Construction guarantees at least a Normal entry.
        &self.signals[0]
    }
}
