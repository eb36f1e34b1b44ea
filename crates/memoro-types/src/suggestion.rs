//! AI category suggestion result.

use serde::{Deserialize, Serialize};

/// A category suggestion produced by the AI adapter.
///
/// Ephemeral; never persisted. After adapter post-processing `category`
/// belongs to [`crate::SUGGESTION_CATEGORIES`] and `confidence` lies in
/// `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySuggestion {
    pub category: String,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub reason: String,
}
