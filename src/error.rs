//! Error handling for crumbs

use thiserror::Error;

/// Main error type for crumbs operations
#[derive(Error, Debug)]
pub enum CrumbsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Collector responded with status {0}")]
    Status(u16),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network timeout")]
    Timeout,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("no data available: {0}")]
    NoData(#[source] Box<CrumbsError>),
}

/// Result type alias for crumbs operations
pub type Result<T> = std::result::Result<T, CrumbsError>;
