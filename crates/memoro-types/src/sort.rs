//! Memo list sort orders.

use serde::{Deserialize, Serialize};

/// The nine supported sort orders for memo lists.
///
/// Priority and category sorts break ties by modified date descending;
/// the date and title sorts have no secondary key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    #[default]
    ModifiedDateDesc,
    ModifiedDateAsc,
    CreatedDateDesc,
    CreatedDateAsc,
    TitleAsc,
    TitleDesc,
    PriorityDesc,
    PriorityAsc,
    CategoryAsc,
}

impl SortOption {
    /// All sort orders, in menu order.
    pub const ALL: [SortOption; 9] = [
        SortOption::ModifiedDateDesc,
        SortOption::ModifiedDateAsc,
        SortOption::CreatedDateDesc,
        SortOption::CreatedDateAsc,
        SortOption::TitleAsc,
        SortOption::TitleDesc,
        SortOption::PriorityDesc,
        SortOption::PriorityAsc,
        SortOption::CategoryAsc,
    ];
}
