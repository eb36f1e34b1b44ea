//! Error types for the storage crate.

use thiserror::Error;

/// Errors that can occur in the storage gateway.
///
/// Callers treat these as a single opaque storage failure; sub-kinds exist
/// for logging and tests, not for control flow.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database connection or statement failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Requested row does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A stored value could not be decoded.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
