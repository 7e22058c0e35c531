use std::io;

/// Every failure the training engine can report.
///
/// Shape and format problems are contract violations: they are surfaced
/// immediately and never retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A decoder stream did not start with the expected magic number.
    #[error("invalid {stream} stream: expected magic {expected}, found {found}")]
    InvalidMagic {
        stream: &'static str,
        expected: u32,
        found: u32,
    },

    /// Decoder input is structurally wrong (count mismatch, label out of range).
    #[error("format error: {0}")]
    Format(String),

    /// A matrix operation received incompatible shapes.
    #[error("{op}: incompatible shapes {left:?} and {right:?}")]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("cannot parse configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A background evaluation thread panicked before reporting.
    #[error("{0} evaluation task panicked")]
    EvaluationPanicked(&'static str),
}

impl Error {
    pub(crate) fn dimensions(
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    ) -> Self {
        Error::DimensionMismatch { op, left, right }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
