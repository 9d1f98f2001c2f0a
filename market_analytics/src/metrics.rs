//! Rolling derived statistics over a canonical series.
//!
//! The engine is incremental: each appended bar costs O(1) amortized because
//! the rolling windows maintain a running sum and sum of squares over a
//! fixed-size ring buffer instead of rescanning history. Full recomputation
//! (for window-size changes or recovery) folds a fresh engine over the whole
//! series and must produce identical output.

use crate::models::{bar::Bar, derived::DerivedPoint, series::Series};

/// Close-over-close percentage return.
///
/// Convention: a zero previous close yields `0.0`, not infinity or NaN, so
/// downstream statistics stay finite. Validated bars cannot carry a zero
/// close, but the arithmetic honors the convention regardless of input.
pub fn percent_return(previous_close: f64, close: f64) -> f64 {
    if previous_close == 0.0 {
        0.0
    } else {
        (close - previous_close) / previous_close * 100.0
    }
}

/// Fixed-capacity ring buffer with maintained aggregates.
#[derive(Debug, Clone)]
struct RollingWindow {
    values: Vec<f64>,
    head: usize,
    len: usize,
    sum: f64,
    sum_sq: f64,
}

impl RollingWindow {
    fn new(capacity: usize) -> Self {
        Self {
            values: vec![0.0; capacity],
            head: 0,
            len: 0,
            sum: 0.0,
            sum_sq: 0.0,
        }
    }

    fn push(&mut self, value: f64) {
        let capacity = self.values.len();
        if self.len == capacity {
            let evicted = self.values[self.head];
            self.sum -= evicted;
            self.sum_sq -= evicted * evicted;
            self.values[self.head] = value;
            self.head = (self.head + 1) % capacity;
        } else {
            self.values[(self.head + self.len) % capacity] = value;
            self.len += 1;
        }
        self.sum += value;
        self.sum_sq += value * value;
    }

    fn is_full(&self) -> bool {
        self.len == self.values.len()
    }

    fn mean(&self) -> f64 {
        self.sum / self.len as f64
    }

    /// Sample standard deviation with Bessel's correction.
    ///
    /// The aggregate form can go slightly negative from rounding; clamp
    /// before the square root.
    fn sample_std_dev(&self) -> f64 {
        let n = self.len as f64;
        let variance = (self.sum_sq - self.sum * self.sum / n) / (n - 1.0);
        variance.max(0.0).sqrt()
    }
}

/// Incremental engine producing one [`DerivedPoint`] per appended bar.
#[derive(Debug, Clone)]
pub struct MetricEngine {
    window: usize,
    last_close: Option<f64>,
    returns: RollingWindow,
    volumes: RollingWindow,
}

impl MetricEngine {
    /// Creates an engine for the given window length (validated by config,
    /// always >= 2).
    pub fn new(window: usize) -> Self {
        Self {
            window,
            last_close: None,
            returns: RollingWindow::new(window),
            volumes: RollingWindow::new(window),
        }
    }

    /// The configured rolling window length in bars.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Feeds the next bar and returns its derived point.
    pub fn push(&mut self, bar: &Bar) -> DerivedPoint {
        let return_pct = self
            .last_close
            .map(|previous| percent_return(previous, bar.close));
        self.last_close = Some(bar.close);

        if let Some(value) = return_pct {
            self.returns.push(value);
        }
        self.volumes.push(bar.volume as f64);

        DerivedPoint {
            return_pct,
            volatility: self.returns.is_full().then(|| self.returns.sample_std_dev()),
            volume_avg: self.volumes.is_full().then(|| self.volumes.mean()),
        }
    }

    /// Recomputes the full derived series from scratch.
    ///
    /// Used when the window size changes; returns the points plus the engine
    /// primed to continue incrementally from the series tail.
    pub fn compute(series: &Series, window: usize) -> (Vec<DerivedPoint>, MetricEngine) {
        let mut engine = MetricEngine::new(window);
        let points = series.bars().iter().map(|bar| engine.push(bar)).collect();
        (points, engine)
    }
}
