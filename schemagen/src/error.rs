//! Error types for schemagen

use thiserror::Error;

/// Result type alias for schemagen operations
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur while reading the catalog or writing artifacts
#[derive(Error, Debug)]
pub enum CodegenError {
    /// Connectivity or query failure, surfaced as reported by the driver
    #[error("MySQL error: {0}")]
    MySql(#[from] mysql_async::Error),

    /// A catalog row could not be decoded
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for CodegenError {
    fn from(err: config::ConfigError) -> Self {
        CodegenError::ConfigError(err.to_string())
    }
}
