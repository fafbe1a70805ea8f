//! Error types for printdesk

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// printdesk errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Policy error: {0}")]
    Policy(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Coupon error: {0}")]
    Coupon(String),

    #[error("Quote error: {0}")]
    Quote(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
