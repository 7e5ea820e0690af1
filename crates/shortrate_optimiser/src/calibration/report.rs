//! Calibration diagnostics.

use std::time::Duration;

/// Model versus market price of one basket instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstrumentFit {
    /// Observed price.
    pub market_price: f64,
    /// Price at the calibrated parameters.
    pub model_price: f64,
}

impl InstrumentFit {
    /// Model minus market price.
    #[inline]
    pub fn error(&self) -> f64 {
        self.model_price - self.market_price
    }
}

/// What the calibrator did and how well the result fits.
///
/// Instruments appear in basket order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationReport {
    /// Per-instrument prices.
    pub instruments: Vec<InstrumentFit>,
    /// Sum of squared pricing errors.
    pub sum_squared_error: f64,
    /// Root mean squared pricing error.
    pub rmse: f64,
    /// Largest absolute pricing error.
    pub max_error: f64,
    /// Simplex and polish iterations across all starts.
    pub iterations: usize,
    /// Start points actually run.
    pub starts: usize,
    /// Whether the polish improved on the simplex result.
    pub polished: bool,
    /// Wall-clock time of the whole calibration.
    pub duration: Duration,
}

impl CalibrationReport {
    /// Build a report from per-instrument prices.
    pub fn new(instruments: Vec<InstrumentFit>) -> Self {
        let sum_squared_error: f64 = instruments.iter().map(|i| i.error().powi(2)).sum();
        let rmse = if instruments.is_empty() {
            0.0
        } else {
            (sum_squared_error / instruments.len() as f64).sqrt()
        };
        let max_error = instruments
            .iter()
            .map(|i| i.error().abs())
            .fold(0.0_f64, f64::max);
        Self {
            instruments,
            sum_squared_error,
            rmse,
            max_error,
            iterations: 0,
            starts: 0,
            polished: false,
            duration: Duration::ZERO,
        }
    }

    /// Set the iteration count.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the number of starts run.
    pub fn with_starts(mut self, starts: usize) -> Self {
        self.starts = starts;
        self
    }

    /// Record whether the polish was kept.
    pub fn with_polished(mut self, polished: bool) -> Self {
        self.polished = polished;
        self
    }

    /// Set the elapsed time.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Pricing errors in basket order.
    pub fn errors(&self) -> Vec<f64> {
        self.instruments.iter().map(InstrumentFit::error).collect()
    }

    /// Whether the RMSE is within `tolerance`.
    pub fn is_quality_acceptable(&self, tolerance: f64) -> bool {
        self.rmse <= tolerance
    }
}
