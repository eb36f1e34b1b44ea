//! Error types for the accounts crate.

use thiserror::Error;

/// Errors that can occur during registration or login.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Username already registered.
    #[error("Username is already taken")]
    UsernameTaken,

    /// Email already registered.
    #[error("Email is already registered")]
    EmailTaken,

    /// Unknown username or wrong password.
    ///
    /// One variant for both cases so a caller cannot probe which part was
    /// wrong.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Underlying storage failure.
    #[error(transparent)]
    Storage(#[from] memoro_store::StorageError),
}

/// Result type alias for account operations.
pub type Result<T> = std::result::Result<T, AccountError>;
