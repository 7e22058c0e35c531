use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::network::topology::Topology;
use crate::train::train_config::TrainConfig;

/// Locations of the two IDX file pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPaths {
    pub train_images: PathBuf,
    pub train_labels: PathBuf,
    pub test_images: PathBuf,
    pub test_labels: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        DataPaths {
            train_images: "data/train-images.idx3-ubyte".into(),
            train_labels: "data/train-labels.idx1-ubyte".into(),
            test_images: "data/t10k-images.idx3-ubyte".into(),
            test_labels: "data/t10k-labels.idx1-ubyte".into(),
        }
    }
}

/// Everything the binary needs for one run, read from a JSON file.
///
/// Omitted sections fall back to the MNIST defaults: 784 inputs, hidden
/// layers of 100 and 10, 10 classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub topology: Topology,
    pub training: TrainConfig,
    pub data: DataPaths,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            topology: Topology::new(28 * 28, vec![100, 10], 10),
            training: TrainConfig::default(),
            data: DataPaths::default(),
        }
    }
}

impl RunConfig {
    /// Reads and validates a run configuration.
    pub fn load_json(path: impl AsRef<Path>) -> Result<RunConfig> {
        let reader = BufReader::new(File::open(path)?);
        let config: RunConfig = serde_json::from_reader(reader)?;
        config.training.validate()?;
        Ok(config)
    }
}
