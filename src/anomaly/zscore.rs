//! Z-score based scorer.
//!
//! Simpler alternative to the isolation forest: the raw score is the negated
//! absolute distance from the batch mean in standard deviations, shifted by
//! the same contamination-quantile offset scheme. Deterministic without a
//! seed.

use super::{quantile, Scorer, DEFAULT_CONTAMINATION};

/// Mean-distance scorer over one numeric feature.
pub struct ZScoreScorer {
    contamination: f64,
    mean: f64,
    std_dev: f64,
    offset: f64,
}

impl Default for ZScoreScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl ZScoreScorer {
    /// Create an unfitted scorer with the default contamination.
    pub fn new() -> Self {
        Self {
            contamination: DEFAULT_CONTAMINATION,
            mean: 0.0,
            std_dev: 0.0,
            offset: 0.0,
        }
    }

    /// Set the expected flagged fraction.
    #[must_use]
    pub fn with_contamination(mut self, contamination: f64) -> Self {
        self.contamination = contamination.clamp(0.0, 0.5);
        self
    }

    fn raw_score(&self, sample: f64) -> f64 {
        if self.std_dev > 0.0 {
            -((sample - self.mean).abs() / self.std_dev)
        } else {
            0.0
        }
    }
}

impl Scorer for ZScoreScorer {
    fn fit(&mut self, samples: &[f64]) {
        self.offset = 0.0;
        if samples.is_empty() {
            self.mean = 0.0;
            self.std_dev = 0.0;
            return;
        }

        let n = samples.len() as f64;
        self.mean = samples.iter().sum::<f64>() / n;
        let variance = samples
            .iter()
            .map(|v| (v - self.mean).powi(2))
            .sum::<f64>()
            / n;
        self.std_dev = variance.sqrt();

        let mut raw: Vec<f64> = samples.iter().map(|&x| self.raw_score(x)).collect();
        raw.sort_by(f64::total_cmp);
        self.offset = quantile(&raw, self.contamination);
    }

    fn score(&self, samples: &[f64]) -> Vec<f64> {
        samples
            .iter()
            .map(|&x| self.raw_score(x) - self.offset)
            .collect()
    }
}
