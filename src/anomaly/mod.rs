//! Unsupervised anomaly flagging for tonnage values
//!
//! Fits an outlier model on the tonnage column of the current batch only and
//! scores every row; there is no persisted model and no cross-run baseline.
//! The flagging rate is calibrated by a fixed contamination ratio rather than
//! learned, which keeps the behavior deterministic and explainable on the
//! small batches this crate typically sees.
//!
//! # Example
//!
//! ```ignore
//! use tonelaje::anomaly::{AnomalyDetector, ScoreMethod};
//!
//! let detector = AnomalyDetector::new()
//!     .with_method(ScoreMethod::IsolationForest)
//!     .with_seed(42);
//!
//! let scored = detector.detect(&table)?;
//! ```

// Statistical computation
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::suboptimal_flops)]

mod forest;
mod zscore;


pub use forest::IsolationForest;
pub use zscore::ZScoreScorer;

use crate::{
    error::{Error, Result},
    table::{Table, Value},
};

/// Default random seed for reproducible scoring.
pub const DEFAULT_SEED: u64 = 42;

/// Default expected fraction of fitted samples to flag.
pub const DEFAULT_CONTAMINATION: f64 = 0.1;

/// An unsupervised outlier scorer over one numeric feature.
///
/// Implementations share one contract: [`score`](Scorer::score) returns a
/// decision score per sample where more negative means more anomalous and
/// zero is the flag threshold, the score ordering is monotone in how unusual
/// a sample is, roughly the contamination fraction of the fitted batch ends
/// up below zero, and results are deterministic for a fixed seed.
pub trait Scorer {
    /// Fits the model on a batch of samples.
    fn fit(&mut self, samples: &[f64]);

    /// Returns a decision score per sample (more negative = more anomalous).
    fn score(&self, samples: &[f64]) -> Vec<f64>;

    /// Returns a binary outlier decision per sample.
    fn decide(&self, samples: &[f64]) -> Vec<bool> {
        self.score(samples).into_iter().map(|s| s < 0.0).collect()
    }
}

/// Available scoring models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreMethod {
    /// Ensemble of random isolation trees (default).
    IsolationForest,
    /// Distance from the batch mean in standard deviations.
    ZScore,
}

impl ScoreMethod {
    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::IsolationForest => "Isolation Forest",
            Self::ZScore => "Z-Score",
        }
    }
}

/// Tonnage anomaly detector.
///
/// Stateless across calls: every [`detect`](Self::detect) fits a fresh model
/// on the rows it is given.
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    method: ScoreMethod,
    contamination: f64,
    seed: u64,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyDetector {
    /// Create a detector with the default model, contamination, and seed.
    pub fn new() -> Self {
        Self {
            method: ScoreMethod::IsolationForest,
            contamination: DEFAULT_CONTAMINATION,
            seed: DEFAULT_SEED,
        }
    }

    /// Set the scoring model.
    #[must_use]
    pub fn with_method(mut self, method: ScoreMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the expected flagged fraction (clamped to `[0, 0.5]`).
    #[must_use]
    pub fn with_contamination(mut self, contamination: f64) -> Self {
        self.contamination = contamination.clamp(0.0, 0.5);
        self
    }

    /// Set the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Scores every row of `table` and appends `anomaly_score` (float) and
    /// `is_anomaly` (bool) columns.
    ///
    /// Rows whose `tonnage` does not coerce to a number (missing or
    /// malformed) are excluded from fitting only; they stay in the output
    /// with score `0.0` and flag `false`. Fitted results merge back by
    /// explicit row index, so row order and count are always preserved. If
    /// no row is fittable, every row gets the defaults and no error is
    /// raised.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnNotFound`] if the table has no `tonnage`
    /// column.
    pub fn detect(&self, table: &Table) -> Result<Table> {
        let tonnage = table
            .column("tonnage")
            .ok_or_else(|| Error::column_not_found("tonnage"))?;

        // (row index, value) pairs for the fit subset
        let fit_rows: Vec<(usize, f64)> = tonnage
            .enumerate()
            .filter_map(|(index, value)| value.as_f64().map(|v| (index, v)))
            .collect();

        let mut scores = vec![0.0_f64; table.num_rows()];
        let mut flags = vec![false; table.num_rows()];

        if !fit_rows.is_empty() {
            let samples: Vec<f64> = fit_rows.iter().map(|(_, v)| *v).collect();
            let mut scorer = self.build_scorer();
            scorer.fit(&samples);
            let sample_scores = scorer.score(&samples);
            let sample_flags = scorer.decide(&samples);

            for (k, (row_index, _)) in fit_rows.iter().enumerate() {
                scores[*row_index] = sample_scores[k];
                flags[*row_index] = sample_flags[k];
            }
        }

        let mut out = table.clone();
        out.append_column("anomaly_score", scores.into_iter().map(Value::Float).collect())?;
        out.append_column("is_anomaly", flags.into_iter().map(Value::Bool).collect())?;
        Ok(out)
    }

    fn build_scorer(&self) -> Box<dyn Scorer> {
        match self.method {
            ScoreMethod::IsolationForest => Box::new(
                IsolationForest::new()
                    .with_contamination(self.contamination)
                    .with_seed(self.seed),
            ),
            ScoreMethod::ZScore => {
                Box::new(ZScoreScorer::new().with_contamination(self.contamination))
            }
        }
    }
}

/// Scores every row of `table` with the default isolation forest model.
///
/// # Errors
///
/// Returns [`Error::ColumnNotFound`] if the table has no `tonnage` column.
pub fn detect_anomalies(table: &Table, seed: u64) -> Result<Table> {
    AnomalyDetector::new().with_seed(seed).detect(table)
}

/// Contamination-quantile of a sorted slice, with linear interpolation.
///
/// Returns 0.0 for an empty slice.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
    }
}
