//! User-facing alert events.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::signal::SignalKind;

/// One alert emitted by the dispatcher after cooldown and severity gating.
///
/// Immutable; the notification-channel collaborator decides how to deliver
/// it (toast, email, log line) — the core only produces the event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEvent {
    /// The instrument the alert refers to.
    pub symbol: String,
    /// Timestamp of the bar that triggered the alert.
    pub timestamp: DateTime<Utc>,
    /// Which rule fired.
    pub kind: SignalKind,
    /// Rule-specific severity score.
    pub severity: f64,
    /// Human-readable one-line description.
    pub message: String,
}
