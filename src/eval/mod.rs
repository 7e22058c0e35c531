pub mod evaluator;
pub mod metrics;
pub mod task;

pub use evaluator::evaluate;
pub use metrics::Metrics;
pub use task::EvaluationTask;
