use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures while loading the job dataset. A load either succeeds
/// completely or returns one of these; there is no partial dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Source has no header row")]
    EmptySource,

    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Invalid date '{value}' on line {line}")]
    InvalidDate { line: u64, value: String },
}

pub type DataResult<T> = Result<T, DataError>;
