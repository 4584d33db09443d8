//! Core error type.
//!
//! Index building itself never fails; these errors come from the edges of
//! the core (endpoint resolution, configuration, document decoding) and from
//! the crates built on top of it.

use thiserror::Error;

/// Result type for habsnap operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Required connection parameters are missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An endpoint type is not present in the REST root.
    #[error("No '{0}' link found in /rest/ root")]
    MissingLink(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
