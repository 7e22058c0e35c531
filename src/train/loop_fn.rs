use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::data::dataset::{shuffled_batches, Dataset};
use crate::error::{Error, Result};
use crate::eval::task::EvaluationTask;
use crate::network::network::Network;
use crate::network::topology::Topology;
use crate::train::epoch_stats::EpochStats;
use crate::train::state::{RunStatus, TrainingState};
use crate::train::train_config::{EvaluationMode, TrainConfig};
use crate::train::trainer::train_step;

/// Outcome of a finished `EpochDriver` run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub status: RunStatus,
    /// Epochs whose every batch was trained.
    pub epochs_completed: usize,
    /// One entry per evaluated epoch, in order.
    pub history: Vec<EpochStats>,
    /// The live network as it was when the run ended.
    pub network: Network,
}

/// Drives mini-batch training epoch by epoch until the user stops it, the
/// held-out metrics converge, or the epoch limit is reached.
///
/// Progress is observable through the shared [`TrainingState`] and, when
/// attached, a channel receiving one [`EpochStats`] per evaluated epoch.
pub struct EpochDriver {
    topology: Topology,
    config: TrainConfig,
    state: Arc<TrainingState>,
    progress_tx: Option<mpsc::Sender<EpochStats>>,
}

struct PendingEvaluation {
    task: EvaluationTask,
    iterations: usize,
    elapsed_ms: u64,
}

impl EpochDriver {
    pub fn new(topology: Topology, config: TrainConfig) -> Result<EpochDriver> {
        config.validate()?;
        Ok(EpochDriver {
            topology,
            config,
            state: Arc::new(TrainingState::new()),
            progress_tx: None,
        })
    }

    /// Reports into an existing state (e.g. one a UI already holds).
    pub fn with_state(mut self, state: Arc<TrainingState>) -> EpochDriver {
        self.state = state;
        self
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<EpochStats>) -> EpochDriver {
        self.progress_tx = Some(tx);
        self
    }

    pub fn state(&self) -> &Arc<TrainingState> {
        &self.state
    }

    /// Runs with `StdRng` seeded from `config.seed`, or `thread_rng` when unset.
    pub fn run(&self, train: Arc<Dataset>, test: Arc<Dataset>) -> Result<TrainingReport> {
        match self.config.seed {
            Some(seed) => self.run_with_rng(train, test, &mut StdRng::seed_from_u64(seed)),
            None => self.run_with_rng(train, test, &mut thread_rng()),
        }
    }

    /// Trains a freshly initialized network; `rng` drives both weight
    /// initialization and the per-epoch shuffle.
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        train: Arc<Dataset>,
        test: Arc<Dataset>,
        rng: &mut R,
    ) -> Result<TrainingReport> {
        if train.is_empty() || test.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "training and held-out sets must not be empty (got {} and {} examples)",
                train.len(),
                test.len()
            )));
        }

        self.check_widths("train set", &train)?;
        self.check_widths("test set", &test)?;

        self.state.reset();
        let mut network = Network::new(self.topology.clone(), self.config.learning_rate, rng);
        let mut history = Vec::new();
        let mut pending: Option<PendingEvaluation> = None;

        info!(
            train_examples = train.len(),
            test_examples = test.len(),
            batch_size = self.config.batch_size,
            epoch_limit = self.config.epoch_limit,
            learning_rate = self.config.learning_rate,
            "training started"
        );

        let outcome = self.train_epochs(&mut network, &train, &test, rng, &mut pending, &mut history);
        let (mut status, epochs_completed) = match outcome {
            Ok(done) => done,
            Err(e) => {
                if let Some(orphan) = pending.take() {
                    // the run already failed; its result is discarded
                    let _ = orphan.task.join();
                }
                return Err(e);
            }
        };

        // Pipelined runs leave the last snapshot's evaluation in flight.
        if let Some(last) = pending.take() {
            let stats = self.finish_evaluation(last, &train, &test, &mut history)?;
            if status == RunStatus::StoppedByEpochLimit && self.config.convergence.is_met(&stats) {
                status = RunStatus::StoppedByConvergence;
            }
        }

        self.state.set_status(status);
        info!(?status, epochs_completed, "training finished");

        Ok(TrainingReport {
            status,
            epochs_completed,
            history,
            network,
        })
    }

    /// Rejects a data set whose input or target width does not fit the topology.
    fn check_widths(&self, set: &'static str, data: &Dataset) -> Result<()> {
        let expected = (self.topology.input_size, self.topology.output_size);
        let found = (data.inputs().cols(), data.targets().cols());
        if found != expected {
            return Err(Error::dimensions(set, found, expected));
        }
        Ok(())
    }

    /// Epoch loop proper. Returns how the run ended and how many epochs were
    /// fully trained; an evaluation still in flight is left in `pending`.
    fn train_epochs<R: Rng + ?Sized>(
        &self,
        network: &mut Network,
        train: &Arc<Dataset>,
        test: &Arc<Dataset>,
        rng: &mut R,
        pending: &mut Option<PendingEvaluation>,
        history: &mut Vec<EpochStats>,
    ) -> Result<(RunStatus, usize)> {
        let mut epochs_completed = 0;

        for epoch in 1..=self.config.epoch_limit {
            let t_start = Instant::now();

            // ── One full pass over the shuffled training data ───────────────
            let iterations = match self.run_one_epoch(epoch, network, train, rng)? {
                Some(iterations) => iterations,
                None => return Ok((RunStatus::StoppedByUser, epochs_completed)),
            };
            epochs_completed = epoch;

            // ── Snapshot and evaluate ─────────────────────────────────────
            let evaluation = PendingEvaluation {
                task: EvaluationTask::spawn(
                    epoch,
                    Arc::new(network.snapshot()),
                    Arc::clone(train),
                    Arc::clone(test),
                ),
                iterations,
                elapsed_ms: t_start.elapsed().as_millis() as u64,
            };

            let ready = match self.config.evaluation {
                EvaluationMode::Blocking => Some(evaluation),
                EvaluationMode::Pipelined => pending.replace(evaluation),
            };

            if let Some(ready) = ready {
                let stats = self.finish_evaluation(ready, train, test, history)?;
                if self.config.convergence.is_met(&stats) {
                    return Ok((RunStatus::StoppedByConvergence, epochs_completed));
                }
            }
        }

        Ok((RunStatus::StoppedByEpochLimit, epochs_completed))
    }

    /// Trains every batch of one shuffled epoch.
    /// Returns the number of batches, or `None` if the stop signal was seen first.
    /// The state only moves on to `epoch` once its first batch is about to train.
    fn run_one_epoch<R: Rng + ?Sized>(
        &self,
        epoch: usize,
        network: &mut Network,
        train: &Dataset,
        rng: &mut R,
    ) -> Result<Option<usize>> {
        let batches = shuffled_batches(train.len(), self.config.batch_size, rng);

        for (i, indices) in batches.iter().enumerate() {
            if self.state.stop_requested() {
                info!(epoch, iteration = i, "stop requested");
                return Ok(None);
            }
            if i == 0 {
                self.state.begin_epoch(epoch);
            }
            train_step(network, &train.batch(indices))?;
            self.state.set_iteration(i + 1);
            debug!(epoch, iteration = i + 1, size = indices.len(), "batch trained");
        }

        Ok(Some(batches.len()))
    }

    /// Joins an evaluation and publishes its stats to the state, the
    /// progress channel and the run history.
    fn finish_evaluation(
        &self,
        pending: PendingEvaluation,
        train: &Dataset,
        test: &Dataset,
        history: &mut Vec<EpochStats>,
    ) -> Result<EpochStats> {
        let epoch = pending.task.epoch();
        let (train_metrics, test_metrics) = pending.task.join()?;
        let stats = EpochStats {
            epoch,
            iterations: pending.iterations,
            train: train_metrics,
            test: test_metrics,
            train_examples: train.len(),
            test_examples: test.len(),
            elapsed_ms: pending.elapsed_ms,
        };

        info!(
            epoch,
            train_cost = stats.train.cost,
            train_accuracy = stats.train_accuracy(),
            test_cost = stats.test.cost,
            test_accuracy = stats.test_accuracy(),
            elapsed_ms = stats.elapsed_ms,
            "epoch evaluated"
        );
        if stats.diverged() {
            warn!(epoch, "cost is no longer finite; lower the learning rate");
        }

        self.state.publish(stats.clone());
        if let Some(ref tx) = self.progress_tx {
            if tx.send(stats.clone()).is_err() {
                debug!(epoch, "progress receiver dropped");
            }
        }
        history.push(stats.clone());

        Ok(stats)
    }
}
