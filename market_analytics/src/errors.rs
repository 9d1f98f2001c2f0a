//! Error taxonomy for the analytics core.
//!
//! Each stage fails fast with the most specific kind it can produce; the
//! pipeline wraps stage failures in [`PipelineError`] tagged with the
//! originating stage and returns to idle without touching committed state.

use market_data_source::providers::ProviderError;
use thiserror::Error;

/// Too many input rows were unusable.
///
/// Recoverable: the caller can supply better data and rerun. The batch that
/// produced this error is dropped in full; previously committed series data
/// is unaffected.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("dropped {dropped} of {seen} rows, above the quality threshold of {threshold}")]
pub struct DataQualityError {
    /// Rows in the incoming batch.
    pub seen: usize,
    /// Rows discarded during normalization.
    pub dropped: usize,
    /// Configured drop threshold (fraction in `[0, 1]`).
    pub threshold: f64,
}

/// Invalid configuration, rejected when a pipeline is constructed.
///
/// Never produced at runtime: a pipeline that was built successfully keeps
/// its configuration valid for its whole lifetime.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("window must be at least 2 bars, got {0}")]
    WindowTooSmall(usize),

    #[error("spike_multiplier must be a finite number greater than 1, got {0}")]
    SpikeMultiplierOutOfRange(f64),

    #[error("anomaly_sigma must be a positive finite number, got {0}")]
    AnomalySigmaOutOfRange(f64),

    #[error("trend_run_length must be at least 2, got {0}")]
    TrendRunTooShort(usize),

    #[error("trend_min_return_pct must be a non-negative finite number, got {0}")]
    TrendMinReturnOutOfRange(f64),

    #[error("min_severity must be a non-negative finite number, got {0}")]
    MinSeverityOutOfRange(f64),

    #[error("quality_drop_threshold must be within [0, 1], got {0}")]
    QualityThresholdOutOfRange(f64),

    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error("failed to read config file")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
}

/// A stage observed data violating an invariant an earlier stage guarantees.
///
/// Reaching this means a defect (e.g. the normalizer let a non-monotonic
/// timestamp through); it is surfaced, never silently corrected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("internal invariant violated: {0}")]
pub struct InternalInvariantError(pub String);

/// Batch-level failure surfaced to the pipeline caller.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The data-source collaborator failed (network, auth, rate limit,
    /// unknown symbol). Retry policy belongs to the caller.
    #[error("fetch stage failed: {0}")]
    DataSource(#[from] ProviderError),

    /// The batch's rows were unusable beyond the configured threshold.
    #[error("normalize stage failed: {0}")]
    DataQuality(#[from] DataQualityError),

    /// An internal invariant was violated mid-batch.
    #[error("{stage} stage failed: {source}")]
    Invariant {
        /// Name of the stage that observed the violation.
        stage: &'static str,
        source: InternalInvariantError,
    },
}

impl PipelineError {
    /// Name of the stage this failure originated from.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::DataSource(_) => "fetch",
            PipelineError::DataQuality(_) => "normalize",
            PipelineError::Invariant { stage, .. } => stage,
        }
    }
}
