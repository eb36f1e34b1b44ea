//! Shared types for the memoro note-taking core.

pub mod categories;
pub mod memo;
pub mod sort;
pub mod suggestion;
pub mod user;

pub use categories::{
    ALL_CATEGORY, DEFAULT_CATEGORIES, DEFAULT_CATEGORY, FALLBACK_CATEGORY, SUGGESTION_CATEGORIES,
};
pub use memo::{Memo, Priority};
pub use sort::SortOption;
pub use suggestion::CategorySuggestion;
pub use user::User;

/// Timestamp type used across the system.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Current time.
pub fn now() -> Timestamp {
    chrono::Utc::now()
}

/// Sentinel id for records that have not been persisted yet.
///
/// Storage assigns the real id on insert; an id of 0 is never valid
/// for a stored row.
pub const UNASSIGNED_ID: i64 = 0;
