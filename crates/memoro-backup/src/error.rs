//! Error types for the backup crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while creating, reading, or applying backups.
#[derive(Debug, Error)]
pub enum BackupError {
    /// Backup file does not exist.
    #[error("Backup file not found: {0}")]
    NotFound(PathBuf),

    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be serialized or parsed.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// A whole-table storage operation failed (per-record failures during
    /// restore are reported in the RestoreReport instead).
    #[error("Storage error: {0}")]
    Storage(#[from] memoro_store::StorageError),
}

/// Result type alias for backup operations.
pub type Result<T> = std::result::Result<T, BackupError>;
