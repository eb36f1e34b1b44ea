//! Snapshot wire format and backup-file metadata.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use memoro_types::{Memo, Timestamp, User, now};

/// Schema tag written into every snapshot.
pub const SNAPSHOT_VERSION: i32 = 1;

fn snapshot_version() -> i32 {
    SNAPSHOT_VERSION
}

/// A full export of the data set.
///
/// Detached copy with no back-reference to storage; immutable once written.
/// Serialized as pretty-printed UTF-8 JSON with all dates as
/// epoch-millisecond integers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSnapshot {
    #[serde(default = "snapshot_version")]
    pub version: i32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub backup_time: Timestamp,
    #[serde(default)]
    pub memos: Vec<Memo>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl BackupSnapshot {
    /// Wrap the given records with the current schema version and time.
    pub fn new(memos: Vec<Memo>, users: Vec<User>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            backup_time: now(),
            memos,
            users,
        }
    }
}

/// Summary metadata for one backup file, shown in the backup list.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupInfo {
    pub file_name: String,
    pub path: PathBuf,
    pub file_size: u64,
    pub backup_time: Timestamp,
    pub memo_count: usize,
    pub user_count: usize,
    pub version: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_uses_camel_case_and_epoch_millis() {
        let snapshot = BackupSnapshot::new(vec![Memo::new("t", "c")], vec![]);
        let json: serde_json::Value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["version"], 1);
        assert_eq!(
            json["backupTime"].as_i64().unwrap(),
            snapshot.backup_time.timestamp_millis()
        );
        assert!(json["memos"][0]["createdDate"].is_i64());
        assert!(json["users"].as_array().unwrap().is_empty());
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let parsed: BackupSnapshot =
            serde_json::from_str(r#"{"backupTime": 1700000000000}"#).unwrap();
        assert_eq!(parsed.version, SNAPSHOT_VERSION);
        assert!(parsed.memos.is_empty());
        assert!(parsed.users.is_empty());
    }
}
