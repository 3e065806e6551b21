//! Error types for chart resolution

use rigger_core::CoreError;
use thiserror::Error;

/// Chart resolution errors
#[derive(Debug, Error)]
pub enum RepoError {
    // ============ Reference Errors ============
    #[error("Invalid chart reference: {reference} - {reason}")]
    InvalidReference { reference: String, reason: String },

    // ============ Network Errors ============
    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Request timeout after {seconds}s")]
    Timeout { seconds: u64 },

    // ============ Chart Errors ============
    #[error("Invalid chart archive: {message}")]
    Archive { message: String },

    #[error(transparent)]
    Chart(#[from] CoreError),

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for chart resolution
pub type Result<T> = std::result::Result<T, RepoError>;

impl From<reqwest::Error> for RepoError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RepoError::Timeout {
                seconds: crate::fetch::REQUEST_TIMEOUT.as_secs(),
            }
        } else if e.is_connect() {
            RepoError::NetworkError {
                message: format!("Connection failed: {}", e),
            }
        } else if let Some(status) = e.status() {
            RepoError::HttpError {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            RepoError::NetworkError {
                message: e.to_string(),
            }
        }
    }
}

impl From<walkdir::Error> for RepoError {
    fn from(e: walkdir::Error) -> Self {
        match e.into_io_error() {
            Some(io) => RepoError::Io(io),
            None => RepoError::Archive {
                message: "filesystem loop while copying chart".to_string(),
            },
        }
    }
}
