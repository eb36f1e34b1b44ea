//! Memo record and priority levels.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::categories::DEFAULT_CATEGORY;
use crate::{Timestamp, UNASSIGNED_ID, now};

/// A user note.
///
/// `created_date` is set once at creation and never changes; `modified_date`
/// is bumped on every successful update, so `modified_date >= created_date`
/// always holds. Dates serialize as epoch-millisecond integers, which is the
/// on-disk backup format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    /// Storage-assigned id; [`UNASSIGNED_ID`] until first persisted.
    #[serde(default)]
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_date: Timestamp,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub modified_date: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Memo {
    /// Create a new unpersisted memo with both dates set to now.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = now();
        Self {
            id: UNASSIGNED_ID,
            title: title.into(),
            content: content.into(),
            created_date: now,
            modified_date: now,
            image_path: None,
            category: DEFAULT_CATEGORY.to_string(),
            priority: Priority::Normal,
        }
    }

    /// Attach a reference to an externally-owned image.
    pub fn with_image_path(mut self, path: impl Into<String>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Whether this memo has been persisted.
    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_ID
    }
}

/// Memo priority, ordinal-ranked for sorting: Normal < Important < Urgent.
///
/// Serializes as its ordinal integer (the stored representation).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    #[default]
    Normal,
    Important,
    Urgent,
}

impl Priority {
    /// The stored ordinal.
    pub fn as_i64(self) -> i64 {
        match self {
            Priority::Normal => 0,
            Priority::Important => 1,
            Priority::Urgent => 2,
        }
    }

    /// Decode a stored ordinal; unknown values fall back to Normal.
    pub fn from_i64(value: i64) -> Self {
        match value {
            1 => Priority::Important,
            2 => Priority::Urgent,
            _ => Priority::Normal,
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Priority::Normal => "Normal",
            Priority::Important => "Important",
            Priority::Urgent => "Urgent",
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Ok(Priority::from_i64(value))
    }
}
