//! Isolation forest over a single numeric feature.
//!
//! Each tree isolates samples with random splits; unusual values need fewer
//! splits to isolate, so their average path length across the ensemble is
//! short. The anomaly measure 2^(-E[h(x)]/c(psi)) follows Liu, Ting & Zhou
//! (2008); the decision score subtracts the contamination-quantile offset of
//! the training scores so that zero is the flag threshold.

use rand::{rngs::StdRng, seq::index, Rng, SeedableRng};

use super::{quantile, Scorer, DEFAULT_CONTAMINATION, DEFAULT_SEED};

const DEFAULT_NUM_TREES: usize = 100;
const DEFAULT_MAX_SAMPLES: usize = 256;

/// Euler-Mascheroni constant, for the harmonic-number approximation.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

enum Node {
    Split {
        value: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        size: usize,
    },
}

/// Seeded ensemble of random isolation trees.
pub struct IsolationForest {
    num_trees: usize,
    max_samples: usize,
    contamination: f64,
    seed: u64,
    trees: Vec<Node>,
    subsample_size: usize,
    offset: f64,
}

impl Default for IsolationForest {
    fn default() -> Self {
        Self::new()
    }
}

impl IsolationForest {
    /// Create an unfitted forest with default parameters.
    pub fn new() -> Self {
        Self {
            num_trees: DEFAULT_NUM_TREES,
            max_samples: DEFAULT_MAX_SAMPLES,
            contamination: DEFAULT_CONTAMINATION,
            seed: DEFAULT_SEED,
            trees: Vec::new(),
            subsample_size: 0,
            offset: 0.0,
        }
    }

    /// Set the number of trees.
    #[must_use]
    pub fn with_num_trees(mut self, num_trees: usize) -> Self {
        self.num_trees = num_trees.max(1);
        self
    }

    /// Set the per-tree subsample ceiling.
    #[must_use]
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples.max(1);
        self
    }

    /// Set the expected flagged fraction.
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

    /// Raw anomaly score in `[-1, 0)`: the negated isolation measure, before
    /// the offset shift. More negative = more anomalous.
    fn raw_score(&self, sample: f64) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .trees
            .iter()
            .map(|root| path_length(root, sample, 0.0))
            .sum();
        let avg_path = total / self.trees.len() as f64;

        let normalizer = average_path_length(self.subsample_size);
        let denom = if normalizer > 0.0 { normalizer } else { 1.0 };
        -(2.0_f64.powf(-avg_path / denom))
    }
}

impl Scorer for IsolationForest {
    fn fit(&mut self, samples: &[f64]) {
        self.trees.clear();
        self.offset = 0.0;
        if samples.is_empty() {
            self.subsample_size = 0;
            return;
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let psi = samples.len().min(self.max_samples);
        self.subsample_size = psi;
        let height_limit = (psi.max(2) as f64).log2().ceil() as usize;

        for _ in 0..self.num_trees {
            let subsample: Vec<f64> = if samples.len() > psi {
                index::sample(&mut rng, samples.len(), psi)
                    .into_iter()
                    .map(|i| samples[i])
                    .collect()
            } else {
                samples.to_vec()
            };
            self.trees
                .push(build_node(&subsample, 0, height_limit, &mut rng));
        }

        // Calibrate the flag threshold on the training scores.
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

fn build_node(values: &[f64], depth: usize, height_limit: usize, rng: &mut StdRng) -> Node {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if values.len() <= 1 || depth >= height_limit || max <= min {
        return Node::Leaf {
            size: values.len(),
        };
    }

    let split = rng.gen_range(min..max);
    let left: Vec<f64> = values.iter().copied().filter(|&v| v < split).collect();
    let right: Vec<f64> = values.iter().copied().filter(|&v| v >= split).collect();

    Node::Split {
        value: split,
        left: Box::new(build_node(&left, depth + 1, height_limit, rng)),
        right: Box::new(build_node(&right, depth + 1, height_limit, rng)),
    }
}

fn path_length(node: &Node, sample: f64, depth: f64) -> f64 {
    match node {
        Node::Leaf { size } => depth + average_path_length(*size),
        Node::Split { value, left, right } => {
            if sample < *value {
                path_length(left, sample, depth + 1.0)
            } else {
                path_length(right, sample, depth + 1.0)
            }
        }
    }
}

/// Expected path length of an unsuccessful BST search over `n` samples.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}
