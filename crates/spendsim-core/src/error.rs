//! Error types for spendsim

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid generator parameters or configuration (bad month, zero count,
    /// empty catalog, all-zero weights, malformed config file)
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Whether this error came from invalid parameters or configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
