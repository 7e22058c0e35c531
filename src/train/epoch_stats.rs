use serde::{Deserialize, Serialize};

use crate::eval::metrics::Metrics;

/// Per-epoch monitoring record emitted by `train_loop`.
///
/// When a progress channel is attached, one `EpochStats` is sent for every
/// epoch whose snapshot evaluation has been joined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Batches trained in this epoch, including the short remainder batch.
    pub iterations: usize,
    /// Snapshot scored against the training set.
    pub train: Metrics,
    /// Snapshot scored against the held-out set.
    pub test: Metrics,
    pub train_examples: usize,
    pub test_examples: usize,
    /// Wall-clock duration of the epoch's training pass in milliseconds.
    pub elapsed_ms: u64,
}

impl EpochStats {
    pub fn train_accuracy(&self) -> f64 {
        self.train.accuracy(self.train_examples)
    }

    pub fn test_accuracy(&self) -> f64 {
        self.test.accuracy(self.test_examples)
    }

    /// True when either cost has become NaN or infinite.
    pub fn diverged(&self) -> bool {
        !(self.train.is_finite() && self.test.is_finite())
    }
}
