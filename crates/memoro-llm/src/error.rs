//! Error types for the LLM crate.

use thiserror::Error;

/// Result type alias using the LLM error type.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur while requesting a category suggestion.
#[derive(Debug, Error)]
pub enum LlmError {
    /// API credential missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/connectivity failure.
    #[error("Network error: {0}")]
    Network(String),

    /// Authentication rejected (HTTP 401).
    #[error("{0}")]
    Auth(String),

    /// Rate limit exceeded (HTTP 429).
    #[error("{0}")]
    RateLimit(String),

    /// Provider-side failure (HTTP 5xx).
    #[error("{0}")]
    Server(String),

    /// Any other unsuccessful API response.
    #[error("{0}")]
    Api(String),

    /// Response body could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The provider returned no completion content.
    #[error("Empty model response")]
    EmptyResponse,

    /// An identical suggestion request is already in flight.
    #[error("A suggestion request for this memo is already running")]
    RequestInFlight,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::Network(e.to_string())
    }
}
