//! Priority-ordered signal classification with explicit rolling state.
//!
//! The rule set is a fixed decision list (volume spike, price anomaly, trend
//! flip, normal), evaluated per newly available bar; the first match is the
//! dominant signal, later matches ride along as secondary signals.
//!
//! Spike and anomaly rules compare a bar against the statistics of the bars
//! BEFORE it (the previous bar's rolling values), so an outlier never
//! contributes to its own baseline.

use serde::Serialize;

use crate::{
    config::AnalyticsConfig,
    models::{
        bar::Bar,
        derived::DerivedPoint,
        series::Series,
        signal::{BarClassification, Signal, SignalKind},
    },
};

/// Direction of the tracked trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TrendDirection {
    /// No established trend yet.
    #[default]
    Flat,
    Up,
    Down,
}

/// Rolling classifier state for one (symbol, interval) pair.
///
/// Carried across batches by value: the caller passes the previous state in
/// and stores the returned one, so a single writer owns it and tests can
/// construct arbitrary prior states directly.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DetectorState {
    /// The last trend a flip was emitted for.
    pub trend: TrendDirection,
    /// Direction of the current same-signed return run.
    pub run_direction: TrendDirection,
    /// Length of the current run, in bars.
    pub run_length: usize,
}

/// Decision-list classifier over canonical and derived series.
#[derive(Debug, Clone)]
pub struct SignalDetector {
    spike_multiplier: f64,
    anomaly_sigma: f64,
    trend_run_length: usize,
    trend_min_return_pct: f64,
}

impl SignalDetector {
    /// Builds a detector from a validated configuration.
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            spike_multiplier: config.spike_multiplier,
            anomaly_sigma: config.anomaly_sigma,
            trend_run_length: config.trend_run_length,
            trend_min_return_pct: config.trend_min_return_pct,
        }
    }

    /// Classifies bars from `start` onward.
    ///
    /// `derived` must be index-aligned with `series`. Returns one
    /// classification per processed bar plus the updated state. Undefined
    /// derived inputs skip their rule without matching — never an error.
    pub fn classify(
        &self,
        series: &Series,
        derived: &[DerivedPoint],
        start: usize,
        mut state: DetectorState,
    ) -> (Vec<BarClassification>, DetectorState) {
        let mut classified = Vec::new();
        for (index, (bar, point)) in series
            .bars()
            .iter()
            .zip(derived)
            .enumerate()
            .skip(start)
        {
            let baseline = index.checked_sub(1).and_then(|prev| derived.get(prev));
            classified.push(self.classify_bar(index, bar, point, baseline, &mut state));
        }
        (classified, state)
    }

    fn classify_bar(
        &self,
        index: usize,
        bar: &Bar,
        point: &DerivedPoint,
        baseline: Option<&DerivedPoint>,
        state: &mut DetectorState,
    ) -> BarClassification {
        let mut signals = Vec::new();

        // Rule 1: volume spike against the trailing volume average.
        if let Some(volume_avg) = baseline.and_then(|b| b.volume_avg)
            && volume_avg > 0.0
        {
            let volume = bar.volume as f64;
            if volume > volume_avg * self.spike_multiplier {
                signals.push(Signal {
                    kind: SignalKind::VolumeSpike,
                    severity: volume / volume_avg,
                });
            }
        }

        // Rule 2: price anomaly against trailing volatility.
        if let (Some(return_pct), Some(volatility)) =
            (point.return_pct, baseline.and_then(|b| b.volatility))
            && volatility > 0.0
            && return_pct.abs() > self.anomaly_sigma * volatility
        {
            signals.push(Signal {
                kind: SignalKind::PriceAnomaly,
                severity: return_pct.abs() / volatility,
            });
        }

        // Rule 3: trend run bookkeeping happens on every bar, whether or not
        // a higher-priority rule already matched.
        if let Some(flip) = self.track_trend(point.return_pct, state) {
            signals.push(flip);
        }

        if signals.is_empty() {
            signals.push(Signal {
                kind: SignalKind::Normal,
                severity: 0.0,
            });
        }

        BarClassification {
            index,
            timestamp: bar.timestamp,
            signals,
        }
    }

    /// Extends or resets the return run; emits a signal only when the run
    /// flips the tracked trend, not on every bar of an ongoing trend.
    fn track_trend(&self, return_pct: Option<f64>, state: &mut DetectorState) -> Option<Signal> {
        let return_pct = return_pct?;

        let direction = if return_pct > self.trend_min_return_pct {
            TrendDirection::Up
        } else if return_pct < -self.trend_min_return_pct {
            TrendDirection::Down
        } else {
            TrendDirection::Flat
        };

        if direction == TrendDirection::Flat {
            state.run_direction = TrendDirection::Flat;
            state.run_length = 0;
            return None;
        }

        if state.run_direction == direction {
            state.run_length += 1;
        } else {
            state.run_direction = direction;
            state.run_length = 1;
        }

        if state.run_length >= self.trend_run_length && state.trend != direction {
            state.trend = direction;
            let kind = if direction == TrendDirection::Up {
                SignalKind::TrendUp
            } else {
                SignalKind::TrendDown
            };
            return Some(Signal {
                kind,
                severity: state.run_length as f64,
            });
        }

        None
    }
}
