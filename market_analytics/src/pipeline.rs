//! Batch orchestration for one (symbol, interval) pair.
//!
//! A pipeline instance exclusively owns every piece of mutable analytics
//! state for its pair: the canonical series, the derived series, the metric
//! engine and the detector/dispatcher rolling states. Instances share
//! nothing, so one instance per pair can run concurrently with others
//! without coordination.
//!
//! Within a batch the stages run strictly in sequence — each stage's output
//! is the next one's sole input and the statistics are order-dependent. All
//! stage outputs are computed against scratch copies and swapped in only
//! after the last stage succeeds; a failing (or cancelled) batch therefore
//! leaves the previously committed state byte-for-byte intact.

use std::sync::Arc;

use market_data_source::{
    models::{interval::Interval, request_params::BarsRequestParams},
    providers::DataProvider,
};
use tracing::{debug, warn};

use crate::{
    config::AnalyticsConfig,
    detector::{DetectorState, SignalDetector},
    dispatcher::{DispatchState, NotificationDispatcher},
    errors::{ConfigError, PipelineError},
    metrics::MetricEngine,
    models::{alert::AlertEvent, derived::DerivedPoint, series::Series, signal::BarClassification},
    normalizer::{self, DropCounts, NormalizeError},
};

/// The stages a batch passes through.
///
/// `Idle` between batches; terminal only on drop. A failure in any stage
/// returns the pipeline to `Idle` with committed state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Fetching,
    Normalizing,
    Computing,
    Classifying,
    Dispatching,
}

impl Stage {
    /// Stable lowercase stage name for logs and error text.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Fetching => "fetch",
            Stage::Normalizing => "normalize",
            Stage::Computing => "compute",
            Stage::Classifying => "classify",
            Stage::Dispatching => "dispatch",
        }
    }
}

/// Summary of one successfully committed batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Raw rows received from the provider.
    pub rows_seen: usize,
    /// Rows the normalizer discarded, by reason.
    pub dropped: DropCounts,
    /// Bars genuinely new to the series (older resends are skipped).
    pub bars_appended: usize,
    /// One classification per appended bar.
    pub classifications: Vec<BarClassification>,
    /// Alerts that survived severity and cooldown gating.
    pub alerts: Vec<AlertEvent>,
}

/// Orchestrates fetch, normalize, compute, classify and dispatch for one
/// (symbol, interval) pair.
pub struct Pipeline {
    symbol: String,
    interval: Interval,
    config: AnalyticsConfig,
    provider: Arc<dyn DataProvider>,
    detector: SignalDetector,
    dispatcher: NotificationDispatcher,
    stage: Stage,

    // Committed state; mutated only by a successful batch commit.
    series: Series,
    derived: Vec<DerivedPoint>,
    engine: MetricEngine,
    detector_state: DetectorState,
    dispatch_state: DispatchState,
}

impl Pipeline {
    /// Builds a pipeline, validating the configuration up front.
    ///
    /// Configuration problems are fatal here and can never surface at
    /// runtime.
    pub fn new(
        symbol: impl Into<String>,
        interval: Interval,
        config: AnalyticsConfig,
        provider: Arc<dyn DataProvider>,
    ) -> Result<Self, ConfigError> {
        let symbol = symbol.into();
        if symbol.is_empty() {
            return Err(ConfigError::EmptySymbol);
        }
        config.validate()?;

        let detector = SignalDetector::new(&config);
        let dispatcher = NotificationDispatcher::new(&config);
        let series = Series::new(symbol.clone(), interval);
        let engine = MetricEngine::new(config.window);

        Ok(Self {
            symbol,
            interval,
            config,
            provider,
            detector,
            dispatcher,
            stage: Stage::Idle,
            series,
            derived: Vec::new(),
            engine,
            detector_state: DetectorState::default(),
            dispatch_state: DispatchState::default(),
        })
    }

    /// The instrument symbol this pipeline tracks.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The bar interval this pipeline tracks.
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// The stage the pipeline is currently in (`Idle` between batches).
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The active configuration.
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Last committed canonical series (read-only; for presentation).
    pub fn series(&self) -> &Series {
        &self.series
    }

    /// Last committed derived series, index-aligned with [`Self::series`].
    pub fn derived(&self) -> &[DerivedPoint] {
        &self.derived
    }

    /// Replaces the configuration and rebuilds derived statistics from the
    /// committed series.
    ///
    /// Rolling detector and cooldown state survive — they track bar history,
    /// not window geometry. The recomputation is the from-scratch path; the
    /// per-batch path stays incremental.
    pub fn update_config(&mut self, config: AnalyticsConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let (derived, engine) = MetricEngine::compute(&self.series, config.window);
        self.detector = SignalDetector::new(&config);
        self.dispatcher = NotificationDispatcher::new(&config);
        self.derived = derived;
        self.engine = engine;
        self.config = config;
        Ok(())
    }

    /// Runs one batch: fetch, normalize, compute, classify, dispatch,
    /// commit.
    ///
    /// On failure the pipeline returns to `Idle` and surfaces a typed error
    /// naming the originating stage; previously committed state is untouched
    /// and remains available through [`Self::series`] / [`Self::derived`].
    pub async fn run_batch(&mut self, month: Option<&str>) -> Result<BatchOutcome, PipelineError> {
        let result = self.run_stages(month).await;
        self.stage = Stage::Idle;
        if let Err(error) = &result {
            warn!(
                symbol = %self.symbol,
                stage = error.stage(),
                %error,
                "batch failed; committed state unchanged"
            );
        }
        result
    }

    async fn run_stages(&mut self, month: Option<&str>) -> Result<BatchOutcome, PipelineError> {
        self.stage = Stage::Fetching;
        debug!(symbol = %self.symbol, interval = %self.interval, "fetching raw records");
        let params = BarsRequestParams {
            symbol: self.symbol.clone(),
            interval: self.interval,
            month: month.map(str::to_string),
        };
        let records = self.provider.fetch_bars(&params).await?;

        self.stage = Stage::Normalizing;
        let batch = normalizer::normalize(
            &self.symbol,
            self.interval,
            &records,
            self.config.quality_drop_threshold,
        )
        .map_err(|error| match error {
            NormalizeError::Quality(source) => PipelineError::DataQuality(source),
            NormalizeError::Invariant(source) => PipelineError::Invariant {
                stage: Stage::Normalizing.name(),
                source,
            },
        })?;
        debug!(
            symbol = %self.symbol,
            rows = batch.rows_seen,
            dropped = batch.dropped.total(),
            "normalized batch"
        );

        // Everything below works on scratch copies; the committed fields are
        // only assigned in the commit block at the end.
        self.stage = Stage::Computing;
        let mut scratch_series = self.series.clone();
        let mut scratch_engine = self.engine.clone();
        let mut scratch_derived = self.derived.clone();
        let start_index = scratch_series.len();
        let cutoff = scratch_series.last_timestamp();

        for bar in batch.series.bars() {
            // Providers resend committed history; only genuinely new bars
            // extend the series.
            if let Some(last_committed) = cutoff
                && bar.timestamp <= last_committed
            {
                continue;
            }
            scratch_series
                .append(bar.clone())
                .map_err(|source| PipelineError::Invariant {
                    stage: Stage::Computing.name(),
                    source,
                })?;
            scratch_derived.push(scratch_engine.push(bar));
        }
        let bars_appended = scratch_series.len() - start_index;

        self.stage = Stage::Classifying;
        let (classifications, detector_state) = self.detector.classify(
            &scratch_series,
            &scratch_derived,
            start_index,
            self.detector_state,
        );

        self.stage = Stage::Dispatching;
        let (alerts, dispatch_state) = self.dispatcher.dispatch(
            &self.symbol,
            &classifications,
            self.dispatch_state.clone(),
        );

        // Commit: the single point where committed state changes.
        self.series = scratch_series;
        self.derived = scratch_derived;
        self.engine = scratch_engine;
        self.detector_state = detector_state;
        self.dispatch_state = dispatch_state;

        debug!(
            symbol = %self.symbol,
            appended = bars_appended,
            alerts = alerts.len(),
            "batch committed"
        );

        Ok(BatchOutcome {
            rows_seen: batch.rows_seen,
            dropped: batch.dropped,
            bars_appended,
            classifications,
            alerts,
        })
    }
}
