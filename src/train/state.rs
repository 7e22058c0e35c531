use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::train::epoch_stats::EpochStats;

/// Lifecycle of one training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// No run has started yet.
    Idle,
    Running,
    /// The stop signal was seen before a batch.
    StoppedByUser,
    /// Held-out accuracy or cost crossed its threshold.
    StoppedByConvergence,
    /// Every allowed epoch was trained.
    StoppedByEpochLimit,
}

/// Observable state of a training run, shared with whoever displays it.
///
/// The epoch driver is the only writer of the counters, status and latest
/// stats; observers read them at any time. The stop signal is the one value
/// observers write.
#[derive(Debug)]
pub struct TrainingState {
    epoch: AtomicUsize,
    iteration: AtomicUsize,
    stop: AtomicBool,
    status: Mutex<RunStatus>,
    latest: Mutex<Option<EpochStats>>,
}

impl Default for TrainingState {
    fn default() -> Self {
        TrainingState::new()
    }
}

impl TrainingState {
    pub fn new() -> Self {
        TrainingState {
            epoch: AtomicUsize::new(0),
            iteration: AtomicUsize::new(0),
            stop: AtomicBool::new(false),
            status: Mutex::new(RunStatus::Idle),
            latest: Mutex::new(None),
        }
    }

    /// Latest epoch that trained at least one batch (1-based, 0 before the first one).
    pub fn epoch(&self) -> usize {
        self.epoch.load(Ordering::Relaxed)
    }

    /// Batches trained so far in the current epoch.
    pub fn iteration(&self) -> usize {
        self.iteration.load(Ordering::Relaxed)
    }

    pub fn status(&self) -> RunStatus {
        *lock(&self.status)
    }

    /// Most recently evaluated epoch, if any.
    pub fn latest(&self) -> Option<EpochStats> {
        lock(&self.latest).clone()
    }

    /// `(train_cost, train_accuracy, test_cost, test_accuracy)` of the latest evaluation.
    pub fn latest_metrics(&self) -> Option<(f64, f64, f64, f64)> {
        lock(&self.latest).as_ref().map(|s| {
            (s.train.cost, s.train_accuracy(), s.test.cost, s.test_accuracy())
        })
    }

    /// Asks the running driver to stop before its next batch.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Withdraws a pending stop request.
    pub fn clear_stop(&self) {
        self.stop.store(false, Ordering::Relaxed);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Clears counters, metrics and any earlier stop request for a new run.
    pub(crate) fn reset(&self) {
        self.clear_stop();
        self.epoch.store(0, Ordering::Relaxed);
        self.iteration.store(0, Ordering::Relaxed);
        *lock(&self.latest) = None;
        self.set_status(RunStatus::Running);
    }

    pub(crate) fn begin_epoch(&self, epoch: usize) {
        self.epoch.store(epoch, Ordering::Relaxed);
        self.iteration.store(0, Ordering::Relaxed);
    }

    pub(crate) fn set_iteration(&self, iteration: usize) {
        self.iteration.store(iteration, Ordering::Relaxed);
    }

    pub(crate) fn publish(&self, stats: EpochStats) {
        *lock(&self.latest) = Some(stats);
    }

    pub(crate) fn set_status(&self, status: RunStatus) {
        *lock(&self.status) = status;
    }
}

// poisoned or not, the guarded values are plain data
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::metrics::Metrics;

    #[test]
    fn reset_starts_a_clean_run() {
        let state = TrainingState::new();
        assert_eq!(state.status(), RunStatus::Idle);

        state.begin_epoch(3);
        state.set_iteration(7);
        state.request_stop();
        state.set_status(RunStatus::StoppedByUser);
        state.reset();

        assert_eq!((state.epoch(), state.iteration()), (0, 0));
        assert_eq!(state.status(), RunStatus::Running);
        assert!(!state.stop_requested());
        assert!(state.latest().is_none());
    }

    #[test]
    fn clear_stop_withdraws_request() {
        let state = TrainingState::new();
        state.request_stop();
        assert!(state.stop_requested());
        state.clear_stop();
        assert!(!state.stop_requested());
    }

    #[test]
    fn latest_metrics_reports_fractions() {
        let state = TrainingState::new();
        assert!(state.latest_metrics().is_none());
        state.publish(EpochStats {
            epoch: 1,
            iterations: 2,
            train: Metrics { correct: 3, cost: 0.4 },
            test: Metrics { correct: 1, cost: 0.6 },
            train_examples: 4,
            test_examples: 2,
            elapsed_ms: 5,
        });
        assert_eq!(state.latest_metrics(), Some((0.4, 0.75, 0.6, 0.5)));
    }
}
