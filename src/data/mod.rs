pub mod dataset;
pub mod idx;

pub use dataset::{shuffled_batches, Batch, Dataset};
pub use idx::{IdxReader, LabeledImage, IMAGE_MAGIC, LABEL_MAGIC};
