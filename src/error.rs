//! Error types for the autocomplete index.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use thiserror::Error;

/// Errors raised by an [`IndexStore`](crate::store::IndexStore) backend.
///
/// The index never retries or rolls back; these are handed to the caller as-is.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Could not establish a connection to the store
    #[error("Store connection failed: {0}")]
    Connection(String),

    /// A command or pipeline was rejected by the store
    #[error("Store command failed: {0}")]
    Command(String),

    /// The store is not reachable (timeout, dropped connection)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_connection_refusal() || err.is_connection_dropped() {
            StoreError::Connection(err.to_string())
        } else if err.is_timeout() || err.is_io_error() {
            StoreError::Unavailable(err.to_string())
        } else {
            StoreError::Command(err.to_string())
        }
    }
}

/// Errors that can occur while maintaining the index.
#[derive(Error, Debug)]
pub enum IndexError {
    /// The item is missing its id or its term
    #[error("Malformed item: {0}")]
    MalformedItem(String),

    /// The underlying store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Failed to encode or decode a stored item
    #[error("Item serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Convenience type alias for Results with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Convenience type alias for Results with IndexError
pub type IndexResult<T> = Result<T, IndexError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
