//! Tunable thresholds for the analytics pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// The full configuration surface consumed by the core.
///
/// Every detection threshold lives here rather than in the detectors
/// themselves, so tests and callers tune behavior instead of
/// reverse-engineering constants. Values are validated once, when a pipeline
/// is constructed; a running pipeline never sees an invalid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Rolling window length in bars for volatility and volume averages.
    pub window: usize,

    /// Volume spike trigger: volume above `baseline * spike_multiplier`.
    pub spike_multiplier: f64,

    /// Price anomaly trigger: |return| above `anomaly_sigma * volatility`.
    pub anomaly_sigma: f64,

    /// Consecutive same-signed returns needed to flip the tracked trend.
    pub trend_run_length: usize,

    /// Minimum |return| (in percent) for a bar to extend a trend run.
    pub trend_min_return_pct: f64,

    /// Bars to wait between two alerts of the same kind for one symbol.
    pub cooldown_period: usize,

    /// Alerts with severity below this floor are discarded outright.
    pub min_severity: f64,

    /// Maximum tolerated fraction of dropped rows per batch, in `[0, 1]`.
    pub quality_drop_threshold: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            window: 20,
            spike_multiplier: 2.0,
            anomaly_sigma: 3.0,
            trend_run_length: 3,
            trend_min_return_pct: 0.0,
            cooldown_period: 5,
            min_severity: 0.0,
            quality_drop_threshold: 0.5,
        }
    }
}

impl AnalyticsConfig {
    /// Checks every field against its allowed range.
    ///
    /// The window floor is 2, not 1: volatility uses Bessel's correction and
    /// divides by `window - 1`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window < 2 {
            return Err(ConfigError::WindowTooSmall(self.window));
        }
        if !self.spike_multiplier.is_finite() || self.spike_multiplier <= 1.0 {
            return Err(ConfigError::SpikeMultiplierOutOfRange(self.spike_multiplier));
        }
        if !self.anomaly_sigma.is_finite() || self.anomaly_sigma <= 0.0 {
            return Err(ConfigError::AnomalySigmaOutOfRange(self.anomaly_sigma));
        }
        if self.trend_run_length < 2 {
            return Err(ConfigError::TrendRunTooShort(self.trend_run_length));
        }
        if !self.trend_min_return_pct.is_finite() || self.trend_min_return_pct < 0.0 {
            return Err(ConfigError::TrendMinReturnOutOfRange(self.trend_min_return_pct));
        }
        if !self.min_severity.is_finite() || self.min_severity < 0.0 {
            return Err(ConfigError::MinSeverityOutOfRange(self.min_severity));
        }
        if !self.quality_drop_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.quality_drop_threshold)
        {
            return Err(ConfigError::QualityThresholdOutOfRange(
                self.quality_drop_threshold,
            ));
        }
        Ok(())
    }

    /// Parses and validates a TOML document. Missing keys take defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        AnalyticsConfig::default().validate().unwrap();
    }

    mod validation {
        use super::*;

        #[test]
        fn window_of_one_is_rejected() {
            let config = AnalyticsConfig {
                window: 1,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::WindowTooSmall(1))
            ));
        }

        #[test]
        fn spike_multiplier_must_exceed_one() {
            let config = AnalyticsConfig {
                spike_multiplier: 1.0,
                ..Default::default()
            };
            assert!(config.validate().is_err());

            let config = AnalyticsConfig {
                spike_multiplier: f64::INFINITY,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn anomaly_sigma_must_be_positive() {
            let config = AnalyticsConfig {
                anomaly_sigma: 0.0,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn trend_run_length_floor_is_two() {
            let config = AnalyticsConfig {
                trend_run_length: 1,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn quality_threshold_is_a_fraction() {
            for bad in [-0.1, 1.5, f64::NAN] {
                let config = AnalyticsConfig {
                    quality_drop_threshold: bad,
                    ..Default::default()
                };
                assert!(config.validate().is_err(), "accepted {bad}");
            }
            let config = AnalyticsConfig {
                quality_drop_threshold: 1.0,
                ..Default::default()
            };
            assert!(config.validate().is_ok());
        }

        #[test]
        fn cooldown_of_zero_is_allowed() {
            let config = AnalyticsConfig {
                cooldown_period: 0,
                ..Default::default()
            };
            assert!(config.validate().is_ok());
        }
    }

    mod toml_surface {
        use super::*;

        #[test]
        fn partial_document_fills_defaults() {
            let config = AnalyticsConfig::from_toml_str(
                r#"
                window = 10
                spike_multiplier = 3.0
                "#,
            )
            .unwrap();
            assert_eq!(config.window, 10);
            assert_eq!(config.spike_multiplier, 3.0);
            assert_eq!(config.cooldown_period, 5);
        }

        #[test]
        fn invalid_values_fail_after_parse() {
            let result = AnalyticsConfig::from_toml_str("window = 1");
            assert!(matches!(result, Err(ConfigError::WindowTooSmall(1))));
        }

        #[test]
        fn malformed_toml_is_a_parse_error() {
            let result = AnalyticsConfig::from_toml_str("window = = 3");
            assert!(matches!(result, Err(ConfigError::Parse(_))));
        }

        #[test]
        fn load_round_trips_through_a_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("analytics.toml");
            std::fs::write(&path, "window = 30\ncooldown_period = 2\n").unwrap();

            let config = AnalyticsConfig::load(&path).unwrap();
            assert_eq!(config.window, 30);
            assert_eq!(config.cooldown_period, 2);

            assert!(matches!(
                AnalyticsConfig::load(&dir.path().join("missing.toml")),
                Err(ConfigError::Io(_))
            ));
        }
    }
}
