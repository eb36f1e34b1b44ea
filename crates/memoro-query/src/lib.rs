//! Reactive query composition for memo lists.
//!
//! The [`QueryComposer`] holds the current search text, category filter, and
//! sort option, and keeps exactly one live query subscribed against the
//! store. Changing any of the three tears the old subscription down and
//! installs a new one; results from a superseded filter combination are
//! never published.

pub mod categories;
pub mod composer;

pub use categories::build_category_list;
pub use composer::{QueryComposer, QueryPlan};
