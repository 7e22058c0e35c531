pub mod epoch_stats;
pub mod loop_fn;
pub mod state;
pub mod train_config;
pub mod trainer;

pub use epoch_stats::EpochStats;
pub use loop_fn::{EpochDriver, TrainingReport};
pub use state::{RunStatus, TrainingState};
pub use train_config::{ConvergenceCriteria, EvaluationMode, TrainConfig};
pub use trainer::train_step;
