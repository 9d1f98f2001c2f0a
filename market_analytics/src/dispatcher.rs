//! Cooldown-gated alert emission.
//!
//! A sustained anomaly or trend produces the same classification bar after
//! bar; dispatching every one of them is an alert storm. The dispatcher
//! emits the first alert of a kind and then suppresses that kind until the
//! cooldown (measured in bars) has elapsed. Severity gating happens before
//! cooldown accounting, so a suppressed-by-severity signal never blocks a
//! later, stronger one.

use indexmap::IndexMap;

use crate::{
    config::AnalyticsConfig,
    models::{
        alert::AlertEvent,
        signal::{BarClassification, Signal, SignalKind},
    },
};

/// Last-alerted bar index per signal kind, for one (symbol, interval) pair.
///
/// Passed in and returned by value like
/// [`DetectorState`](crate::detector::DetectorState): one writer, trivially
/// constructible in tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchState {
    last_alert_index: IndexMap<SignalKind, usize>,
}

impl DispatchState {
    /// Records an alert of `kind` at `index` (exposed for tests constructing
    /// arbitrary prior states).
    pub fn record(&mut self, kind: SignalKind, index: usize) {
        self.last_alert_index.insert(kind, index);
    }

    /// The bar index of the last emitted alert of `kind`, if any.
    pub fn last_alert(&self, kind: SignalKind) -> Option<usize> {
        self.last_alert_index.get(&kind).copied()
    }
}

/// Turns classified bars into user-facing alerts.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    cooldown_period: usize,
    min_severity: f64,
}

impl NotificationDispatcher {
    /// Builds a dispatcher from a validated configuration.
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            cooldown_period: config.cooldown_period,
            min_severity: config.min_severity,
        }
    }

    /// Applies severity and cooldown gating to a batch of classifications.
    ///
    /// Emits at most one alert per bar per kind; kinds cool down
    /// independently. `Normal` never alerts. Pure function of its inputs and
    /// the passed-in state.
    pub fn dispatch(
        &self,
        symbol: &str,
        classified: &[BarClassification],
        mut state: DispatchState,
    ) -> (Vec<AlertEvent>, DispatchState) {
        let mut alerts = Vec::new();

        for classification in classified {
            for signal in &classification.signals {
                if signal.kind == SignalKind::Normal {
                    continue;
                }
                // Below the floor: discard without touching cooldown state.
                if signal.severity < self.min_severity {
                    continue;
                }
                let cooled_down = match state.last_alert(signal.kind) {
                    Some(last) => classification
                        .index
                        .checked_sub(last)
                        .is_some_and(|gap| gap >= self.cooldown_period),
                    None => true,
                };
                if !cooled_down {
                    continue;
                }

                state.record(signal.kind, classification.index);
                alerts.push(AlertEvent {
                    symbol: symbol.to_string(),
                    timestamp: classification.timestamp,
                    kind: signal.kind,
                    severity: signal.severity,
                    message: render_message(symbol, signal),
                });
            }
        }

        (alerts, state)
    }
}

fn render_message(symbol: &str, signal: &Signal) -> String {
    match signal.kind {
        SignalKind::VolumeSpike => format!(
            "{symbol}: volume {:.1}x its rolling average",
            signal.severity
        ),
        SignalKind::PriceAnomaly => format!(
            "{symbol}: price moved {:.1} sigma beyond rolling volatility",
            signal.severity
        ),
        SignalKind::TrendUp => format!(
            "{symbol}: trend flipped up after {} rising bars",
            signal.severity as u64
        ),
        SignalKind::TrendDown => format!(
            "{symbol}: trend flipped down after {} falling bars",
            signal.severity as u64
        ),
        SignalKind::Normal => format!("{symbol}: no signal"),
    }
}
