use std::path::PathBuf;
use thiserror::Error;

/// Boundary failures. Domain data problems never surface here: builders render
/// empty states instead.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("analysis document is not valid JSON or JSON5: {0}")]
    Parse(String),
    #[error("analysis document must be a JSON object, found {0}")]
    NotAnObject(&'static str),
    #[error("invalid config file {path}: {message}")]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, ReportError>;
