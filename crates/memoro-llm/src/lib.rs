//! Chat-completion client and category suggestion adapter.
//!
//! [`ChatClient`] talks to a DeepSeek-compatible chat-completion endpoint.
//! [`CategorySuggester`] wraps any [`ChatCompleter`] and turns free-text
//! model replies into a [`memoro_types::CategorySuggestion`] from the fixed
//! category vocabulary. It never fails once the network call itself
//! succeeded, falling back to keyword matching and finally to "Other".

pub mod client;
pub mod error;
pub mod suggest;
pub mod types;

pub use client::{ChatClient, ChatCompleter, ChatConfig};
pub use error::{LlmError, Result};
pub use suggest::CategorySuggester;
pub use types::{ChatMessage, ChatRequest, ChatResponse, Choice, Usage};
