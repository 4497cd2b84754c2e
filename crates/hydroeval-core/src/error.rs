//! Error type shared by validation, metrics, dispatch and the loaders.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised synchronously at the point of detection.
///
/// Metrics that are mathematically undefined for the given data do not
/// produce an error; they return `f64::NAN` instead.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Observed and simulated shapes disagree, or a series is not 1-D.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A parameter is outside its required domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Requested metric name is not recognised.
    #[error("unknown metric {0:?}")]
    UnknownMetric(String),

    /// Every value of the observed or the simulated series is missing.
    #[error("all observed or all simulated values are NaN")]
    AllNaN,

    /// No data file exists for the requested basin.
    #[error("not found: {0}")]
    NotFound(String),

    /// A data file exists but its content is malformed.
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EvalError {
    pub(crate) fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;
