// Trains a classifier on an IDX dataset pair described by a JSON run config:
//   ferrite-mlp run.json
// Set RUST_LOG=debug for per-batch logging.
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

use ferrite_mlp::{Dataset, EpochDriver, Error, IdxReader, Result, RunConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn install_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().compact().with_env_filter(filter).init();
}

fn load(name: &str, images: &Path, labels: &Path, classes: usize) -> Result<Dataset> {
    let reader = IdxReader::open(images, labels)?;
    info!(set = name, records = reader.remaining(), rows = reader.rows(), cols = reader.cols(), "decoding");
    Dataset::from_samples(reader, classes)
}

fn run(config_path: &str) -> Result<()> {
    let config = RunConfig::load_json(config_path)?;
    let classes = config.topology.output_size;
    let data = &config.data;

    let (train, test) = thread::scope(|s| {
        let train = s.spawn(|| load("train", &data.train_images, &data.train_labels, classes));
        let test = s.spawn(|| load("test", &data.test_images, &data.test_labels, classes));
        (train.join(), test.join())
    });
    let train = train.map_err(|_| Error::Format("training set decoder panicked".into()))??;
    let test = test.map_err(|_| Error::Format("test set decoder panicked".into()))??;

    let driver = EpochDriver::new(config.topology.clone(), config.training.clone())?;
    let report = driver.run(Arc::new(train), Arc::new(test))?;

    let summary = serde_json::json!({
        "status": report.status,
        "epochs_completed": report.epochs_completed,
        "last_epoch": report.history.last(),
        "weights_finite": report.network.is_finite(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn main() -> ExitCode {
    install_logger();

    let Some(config_path) = std::env::args().nth(1) else {
        eprintln!("usage: ferrite-mlp <run-config.json>");
        return ExitCode::from(2);
    };

    match run(&config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
