use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::data::dataset::Dataset;
use crate::error::{Error, Result};
use crate::eval::evaluator::evaluate;
use crate::eval::metrics::Metrics;
use crate::network::network::Network;

/// Evaluation of one snapshot against the training and held-out sets,
/// running on two background threads.
///
/// Only the snapshot and the two immutable datasets are shared, so the live
/// network can keep training while this runs.
pub struct EvaluationTask {
    epoch: usize,
    train: JoinHandle<Result<Metrics>>,
    test: JoinHandle<Result<Metrics>>,
}

impl EvaluationTask {
    pub fn spawn(
        epoch: usize,
        snapshot: Arc<Network>,
        train: Arc<Dataset>,
        test: Arc<Dataset>,
    ) -> EvaluationTask {
        EvaluationTask {
            epoch,
            train: spawn_one(epoch, "train", Arc::clone(&snapshot), train),
            test: spawn_one(epoch, "test", snapshot, test),
        }
    }

    /// Epoch whose snapshot is being evaluated.
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    /// Blocks until both evaluations finish. Returns `(train, test)`.
    pub fn join(self) -> Result<(Metrics, Metrics)> {
        // join both before reporting so no thread outlives the task
        let train = self.train.join();
        let test = self.test.join();
        let train = train.map_err(|_| Error::EvaluationPanicked("train"))??;
        let test = test.map_err(|_| Error::EvaluationPanicked("test"))??;
        Ok((train, test))
    }
}

fn spawn_one(
    epoch: usize,
    name: &'static str,
    snapshot: Arc<Network>,
    dataset: Arc<Dataset>,
) -> JoinHandle<Result<Metrics>> {
    thread::spawn(move || {
        let metrics = evaluate(snapshot.weights(), dataset.inputs(), dataset.targets())?;
        debug!(epoch, set = name, correct = metrics.correct, cost = metrics.cost, "snapshot evaluated");
        Ok(metrics)
    })
}
