//! Error types for the onyx_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for onyx_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// User input rejected before anything was written
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Data layer failure (after retry)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether a second attempt could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_io_is_transient() {
        let io = Error::from(io::Error::new(io::ErrorKind::Interrupted, "busy"));
        assert!(io.is_transient());
        assert!(!Error::NotFound("exercise 9".to_string()).is_transient());
        assert!(!Error::Storage("bad table".to_string()).is_transient());
    }
}
