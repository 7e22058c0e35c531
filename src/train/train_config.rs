use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::train::epoch_stats::EpochStats;

/// When a snapshot evaluation is joined relative to training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Join epoch N's evaluation before epoch N+1 starts.
    Blocking,
    /// Let epoch N's evaluation run alongside epoch N+1's training; it is
    /// joined after that epoch, so convergence stops the run one epoch late.
    Pipelined,
}

impl Default for EvaluationMode {
    fn default() -> Self {
        EvaluationMode::Blocking
    }
}

/// Held-out thresholds that end a run early.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvergenceCriteria {
    /// Stop once held-out accuracy (a fraction) is strictly above this.
    pub min_test_accuracy: f64,
    /// Stop once held-out cost is strictly below this.
    pub max_test_cost: f64,
}

impl Default for ConvergenceCriteria {
    fn default() -> Self {
        ConvergenceCriteria {
            min_test_accuracy: 0.9,
            max_test_cost: 0.001,
        }
    }
}

impl ConvergenceCriteria {
    /// A non-finite held-out cost never counts as converged.
    pub fn is_met(&self, stats: &EpochStats) -> bool {
        if !stats.test.is_finite() {
            return false;
        }
        stats.test_accuracy() > self.min_test_accuracy || stats.test.cost < self.max_test_cost
    }
}

/// Hyperparameters for a `train_loop` run.
///
/// # Fields
/// - `learning_rate` — gradient descent step size
/// - `batch_size`    — examples per mini-batch; the last batch of an epoch may be shorter
/// - `epoch_limit`   — maximum number of full passes over the training set
/// - `seed`          — fixed RNG seed for weight init and shuffling; `None` uses `thread_rng`
/// - `evaluation`    — how snapshot evaluation overlaps with training
/// - `convergence`   — early-stop thresholds on held-out data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub learning_rate: f64,
    pub batch_size: usize,
    pub epoch_limit: usize,
    pub seed: Option<u64>,
    pub evaluation: EvaluationMode,
    pub convergence: ConvergenceCriteria,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            learning_rate: 1.0,
            batch_size: 100,
            epoch_limit: 100,
            seed: None,
            evaluation: EvaluationMode::default(),
            convergence: ConvergenceCriteria::default(),
        }
    }
}

impl TrainConfig {
    pub fn new(learning_rate: f64, batch_size: usize, epoch_limit: usize) -> Self {
        TrainConfig {
            learning_rate,
            batch_size,
            epoch_limit,
            ..TrainConfig::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be at least 1".into()));
        }
        if self.epoch_limit == 0 {
            return Err(Error::InvalidConfig("epoch_limit must be at least 1".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}
