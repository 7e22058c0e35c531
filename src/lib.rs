pub mod activation;
pub mod config;
pub mod data;
pub mod error;
pub mod eval;
pub mod loss;
pub mod math;
pub mod network;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use config::{DataPaths, RunConfig};
pub use data::{Batch, Dataset, IdxReader, LabeledImage};
pub use error::{Error, Result};
pub use eval::{evaluate, EvaluationTask, Metrics};
pub use loss::BceLoss;
pub use math::Matrix;
pub use network::{Network, Topology, WeightSet};
pub use optim::Sgd;
pub use train::{
    train_step, ConvergenceCriteria, EpochDriver, EpochStats, EvaluationMode, RunStatus,
    TrainConfig, TrainingReport, TrainingState,
};
