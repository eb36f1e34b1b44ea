//! Application-level error type.

use thiserror::Error;

/// Errors surfaced by the [`crate::App`] facade.
///
/// Every variant renders as a short human-readable message; no operation
/// retries automatically.
#[derive(Debug, Error)]
pub enum AppError {
    /// Memo titles must contain at least one non-whitespace character.
    #[error("Title must not be empty")]
    EmptyTitle,

    #[error(transparent)]
    Storage(#[from] memoro_store::StorageError),

    #[error(transparent)]
    Backup(#[from] memoro_backup::BackupError),

    #[error(transparent)]
    Suggestion(#[from] memoro_llm::LlmError),

    #[error(transparent)]
    Config(#[from] memoro_config::ConfigError),

    #[error(transparent)]
    Account(#[from] memoro_accounts::AccountError),
}

/// Result type alias for app operations.
pub type Result<T> = std::result::Result<T, AppError>;
