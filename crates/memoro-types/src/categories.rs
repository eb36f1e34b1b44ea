//! Category vocabularies and sentinels.

/// Pseudo-category meaning "no category filter applied".
pub const ALL_CATEGORY: &str = "All";

/// Category assigned to memos that were never categorized.
pub const DEFAULT_CATEGORY: &str = "Default";

/// Category used when AI classification cannot produce a vocabulary match.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Predefined categories offered in the picker.
///
/// Appended (when missing) after the categories actually present in
/// storage; the concatenation order is the display order.
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Default", "Work", "Life", "Study", "Health", "Travel", "Shopping", "Important",
];

/// The fixed vocabulary the AI adapter classifies into.
pub const SUGGESTION_CATEGORIES: [&str; 12] = [
    "Work",
    "Study",
    "Life",
    "Health",
    "Travel",
    "Shopping",
    "Entertainment",
    "Relationships",
    "Finance",
    "Planning",
    "Ideas",
    "Other",
];
