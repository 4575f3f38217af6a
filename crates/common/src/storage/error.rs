//! Storage error types
//!
//! Errors raised by key-value backends. Absence of a key is not an error;
//! backends report it as `Ok(None)`.

use thiserror::Error;

/// Storage error type
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem access failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Backing document could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Platform keychain refused the operation
    #[error("Keychain error: {0}")]
    Keychain(String),

    /// Any other backend-specific failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Storage result type
pub type StorageResult<T> = Result<T, StorageError>;
