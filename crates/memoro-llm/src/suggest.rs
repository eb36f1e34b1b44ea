//! Category suggestion adapter.
//!
//! Turns a free-text model reply into a [`CategorySuggestion`] whose
//! category belongs to the fixed vocabulary. Once the outbound call has
//! succeeded this adapter always produces a best-effort suggestion; only
//! the call itself can fail.

use std::collections::HashSet;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::{Arc, Mutex};

use tracing::debug;

use memoro_config::ConfigStore;
use memoro_types::{CategorySuggestion, FALLBACK_CATEGORY, SUGGESTION_CATEGORIES};

use crate::client::ChatCompleter;
use crate::error::{LlmError, Result};
use crate::types::{ChatMessage, ChatRequest};

/// Sampling temperature for classification requests.
const SUGGEST_TEMPERATURE: f32 = 0.3;

/// Token budget for classification requests.
const SUGGEST_MAX_TOKENS: u32 = 100;

/// Reason attached when the reply had no JSON object at all.
const KEYWORD_REASON: &str = "Matched by keyword analysis";

/// Reason attached when the reply had a JSON object that failed to parse.
const PARSE_FAILED_REASON: &str = "Could not parse the model reply; matched keywords instead";

/// Keyword table used to map a near-miss category label back into the
/// vocabulary. Checked in order; first hit wins.
const SIMILAR_CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("Work", &["work", "office", "meeting", "project", "task", "job"]),
    ("Study", &["study", "school", "course", "exam", "homework", "learn"]),
    ("Life", &["life", "daily", "family", "household", "chores"]),
    ("Health", &["health", "medical", "exercise", "workout", "fitness", "body"]),
    ("Travel", &["travel", "trip", "vacation", "tour", "sightseeing"]),
    ("Shopping", &["shopping", "buy", "store", "groceries", "purchase"]),
    ("Entertainment", &["entertainment", "movie", "game", "music", "leisure"]),
    ("Relationships", &["friend", "family", "colleague", "party", "social"]),
    ("Finance", &["finance", "money", "budget", "investment", "expense", "income"]),
    ("Planning", &["plan", "schedule", "agenda", "goal", "todo"]),
    ("Ideas", &["idea", "creative", "inspiration", "thought"]),
];

/// Keyword table used to classify raw reply text when no JSON could be
/// recovered. Checked in order; first hit wins.
const TEXT_CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("Work", &["work", "office", "meeting", "project", "task", "job", "colleague", "deadline"]),
    ("Study", &["study", "school", "course", "exam", "homework", "learn", "book", "reading"]),
    ("Life", &["life", "daily", "family", "household", "chores", "cooking", "cleaning", "home"]),
    ("Health", &["health", "medical", "exercise", "workout", "fitness", "body", "doctor", "medicine"]),
    ("Travel", &["travel", "trip", "vacation", "tour", "sightseeing", "hotel", "flight"]),
    ("Shopping", &["shopping", "buy", "store", "groceries", "purchase", "supermarket", "order"]),
    ("Entertainment", &["entertainment", "movie", "game", "music", "leisure", "show", "concert"]),
    ("Relationships", &["friend", "family", "colleague", "party", "social", "date", "chat"]),
    ("Finance", &["finance", "money", "budget", "investment", "expense", "income", "bill", "salary"]),
    ("Planning", &["plan", "schedule", "agenda", "goal", "todo", "prepare", "arrange"]),
    ("Ideas", &["idea", "creative", "inspiration", "thought", "brainstorm", "reflection"]),
];

/// Asks the chat collaborator to classify a memo and normalizes the reply.
///
/// Holds a single-flight guard keyed by the request content: while a
/// suggestion for a given (title, content) pair is running, an identical
/// concurrent request fails fast with [`LlmError::RequestInFlight`].
pub struct CategorySuggester {
    completer: Arc<dyn ChatCompleter>,
    config: Arc<ConfigStore>,
    model: String,
    in_flight: Mutex<HashSet<u64>>,
}

impl CategorySuggester {
    pub fn new(
        completer: Arc<dyn ChatCompleter>,
        config: Arc<ConfigStore>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            completer,
            config,
            model: model.into(),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Whether any suggestion request is currently in flight.
    pub fn is_loading(&self) -> bool {
        !self.in_flight.lock().unwrap().is_empty()
    }

    /// Suggest a category for the given memo text.
    pub async fn suggest(&self, title: &str, content: &str) -> Result<CategorySuggestion> {
        let api_key = self
            .config
            .api_key()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                LlmError::Config(
                    "API key not configured; set a DeepSeek API key in settings".to_string(),
                )
            })?;

        let _guard = InFlightGuard::acquire(&self.in_flight, request_key(title, content))
            .ok_or(LlmError::RequestInFlight)?;

        let request = ChatRequest::new(
            &self.model,
            vec![ChatMessage::user(build_prompt(title, content))],
        )
        .with_temperature(SUGGEST_TEMPERATURE)
        .with_max_tokens(SUGGEST_MAX_TOKENS);

        let response = self.completer.complete(&api_key, request).await?;
        let text = response.first_content().ok_or(LlmError::EmptyResponse)?;

        let suggestion = parse_response(text);
        debug!(
            category = %suggestion.category,
            confidence = suggestion.confidence,
            "Category suggestion produced"
        );
        Ok(suggestion)
    }
}

/// Removes its key from the in-flight set on drop.
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<u64>>,
    key: u64,
}

impl<'a> InFlightGuard<'a> {
    /// Claim the key, or None if an identical request already holds it.
    fn acquire(set: &'a Mutex<HashSet<u64>>, key: u64) -> Option<Self> {
        if set.lock().unwrap().insert(key) {
            Some(Self { set, key })
        } else {
            None
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.lock().unwrap().remove(&self.key);
    }
}

fn request_key(title: &str, content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    title.hash(&mut hasher);
    content.hash(&mut hasher);
    hasher.finish()
}

/// Build the classification prompt.
fn build_prompt(title: &str, content: &str) -> String {
    let categories = SUGGESTION_CATEGORIES.join(", ");
    format!(
        "Analyze the following memo and pick the single most fitting category \
         from this list: {categories}\n\
         \n\
         Memo title: {title}\n\
         Memo content: {content}\n\
         \n\
         Reply in JSON with these fields:\n\
         - category: the chosen category\n\
         - confidence: a decimal between 0 and 1\n\
         - reason: a short justification for the choice\n\
         \n\
         Example format:\n\
         {{\"category\": \"Work\", \"confidence\": 0.85, \"reason\": \"Mentions a meeting and a project deadline\"}}"
    )
}

/// Normalize a model reply into a vocabulary suggestion.
///
/// Takes the substring from the first `{` to the last `}` and parses it;
/// an out-of-vocabulary category goes through the similarity table before
/// falling back to "Other", and confidence is clamped to [0, 1]. Replies
/// without a parsable JSON object degrade to keyword matching over the raw
/// text.
fn parse_response(text: &str) -> CategorySuggestion {
    let start = text.find('{');
    let end = text.rfind('}');

    let json = match (start, end) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => {
            return CategorySuggestion {
                category: extract_category_from_text(text),
                confidence: 0.5,
                reason: KEYWORD_REASON.to_string(),
            };
        }
    };

    match serde_json::from_str::<CategorySuggestion>(json) {
        Ok(parsed) => {
            let category = if SUGGESTION_CATEGORIES.contains(&parsed.category.as_str()) {
                parsed.category
            } else {
                find_similar_category(&parsed.category)
                    .unwrap_or(FALLBACK_CATEGORY)
                    .to_string()
            };
            CategorySuggestion {
                category,
                confidence: parsed.confidence.clamp(0.0, 1.0),
                reason: parsed.reason,
            }
        }
        Err(_) => CategorySuggestion {
            category: extract_category_from_text(text),
            confidence: 0.3,
            reason: PARSE_FAILED_REASON.to_string(),
        },
    }
}

/// Map a near-miss category label into the vocabulary.
fn find_similar_category(label: &str) -> Option<&'static str> {
    let label = label.to_lowercase();
    SIMILAR_CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| label.contains(kw)))
        .map(|(category, _)| *category)
}

/// Classify raw text by keyword; "Other" when nothing matches.
fn extract_category_from_text(text: &str) -> String {
    let text = text.to_lowercase();
    TEXT_CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
        .map(|(category, _)| category.to_string())
        .unwrap_or_else(|| FALLBACK_CATEGORY.to_string())
}
