//! Backup directory management and restore reconciliation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use memoro_store::MemoStore;
use memoro_types::{Memo, SortOption, UNASSIGNED_ID, User};

use crate::error::{BackupError, Result};
use crate::snapshot::{BackupInfo, BackupSnapshot};

const BACKUP_FILE_PREFIX: &str = "memo_backup_";
const BACKUP_FILE_EXTENSION: &str = ".json";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Per-record outcome counts for a restore.
///
/// Individual insert failures do not abort a restore; they are tallied
/// here so callers can tell a full restore from a partial one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub memos_inserted: usize,
    pub memos_failed: usize,
    pub users_inserted: usize,
    /// Users whose username already existed; left untouched.
    pub users_skipped: usize,
    pub users_failed: usize,
}

impl RestoreReport {
    /// True when no per-record insert failed.
    pub fn is_complete(&self) -> bool {
        self.memos_failed == 0 && self.users_failed == 0
    }
}

/// Creates, lists, applies, and deletes backup snapshots.
pub struct BackupManager {
    store: Arc<MemoStore>,
    backup_dir: PathBuf,
}

impl BackupManager {
    pub fn new(store: Arc<MemoStore>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            backup_dir: backup_dir.into(),
        }
    }

    /// The directory backups are written to.
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Export every memo and user to a new timestamped snapshot file.
    ///
    /// Creates the backup directory if absent and returns the absolute
    /// path of the written file.
    pub fn create_backup(&self) -> Result<PathBuf> {
        let memos = self.store.list_memos(SortOption::ModifiedDateDesc)?;
        let users = self.store.list_users()?;
        let snapshot = BackupSnapshot::new(memos, users);

        fs::create_dir_all(&self.backup_dir)?;

        let file_name = format!(
            "{BACKUP_FILE_PREFIX}{}{BACKUP_FILE_EXTENSION}",
            chrono::Local::now().format(TIMESTAMP_FORMAT)
        );
        let path = self.backup_dir.join(file_name);

        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&path, json)?;

        info!(
            "Backup written to {:?} ({} memos, {} users)",
            path,
            snapshot.memos.len(),
            snapshot.users.len()
        );
        Ok(path.canonicalize().unwrap_or(path))
    }

    /// Parse a snapshot file without applying it.
    pub fn read_snapshot(&self, path: impl AsRef<Path>) -> Result<BackupSnapshot> {
        let path = path.as_ref();
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BackupError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&json)?)
    }

    /// Merge a snapshot back into storage.
    ///
    /// With `clear_existing`, every memo is deleted first; the user table
    /// is never cleared. Users already present (by username) are skipped;
    /// everything else is inserted with the id reset so storage assigns a
    /// fresh one. Memos are never de-duplicated; restoring the same
    /// snapshot twice duplicates them. Single-record failures are tallied
    /// in the report and do not abort the restore.
    ///
    /// Not transactional: a crash mid-restore leaves a partial merge.
    pub fn restore(
        &self,
        path: impl AsRef<Path>,
        clear_existing: bool,
    ) -> Result<(BackupSnapshot, RestoreReport)> {
        let snapshot = self.read_snapshot(path)?;

        if clear_existing {
            let removed = self.store.delete_all_memos()?;
            debug!("Cleared {} existing memos before restore", removed);
        }

        let mut report = RestoreReport::default();

        for user in &snapshot.users {
            match self.store.find_user_by_username(&user.username) {
                Ok(Some(_)) => report.users_skipped += 1,
                Ok(None) => {
                    let fresh = User {
                        id: UNASSIGNED_ID,
                        ..user.clone()
                    };
                    match self.store.insert_user(&fresh) {
                        Ok(_) => report.users_inserted += 1,
                        Err(e) => {
                            warn!("Skipping user {}: {e}", user.username);
                            report.users_failed += 1;
                        }
                    }
                }
                Err(e) => {
                    warn!("Skipping user {}: {e}", user.username);
                    report.users_failed += 1;
                }
            }
        }

        for memo in &snapshot.memos {
            let fresh = Memo {
                id: UNASSIGNED_ID,
                ..memo.clone()
            };
            match self.store.insert_memo(&fresh) {
                Ok(_) => report.memos_inserted += 1,
                Err(e) => {
                    warn!("Skipping memo {:?}: {e}", memo.title);
                    report.memos_failed += 1;
                }
            }
        }

        info!(
            "Restore complete: {} memos inserted ({} failed), {} users inserted, {} skipped ({} failed)",
            report.memos_inserted,
            report.memos_failed,
            report.users_inserted,
            report.users_skipped,
            report.users_failed
        );
        Ok((snapshot, report))
    }

    /// List backup files in the managed directory, most recent first.
    ///
    /// Each file is parsed eagerly for its summary metadata; files that
    /// fail to parse are excluded from the list.
    pub fn list_backups(&self) -> Vec<BackupInfo> {
        let entries = match fs::read_dir(&self.backup_dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut files: Vec<(PathBuf, std::time::SystemTime)> = entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                let name = path.file_name()?.to_str()?;
                if !path.is_file()
                    || !name.starts_with(BACKUP_FILE_PREFIX)
                    || !name.ends_with(BACKUP_FILE_EXTENSION)
                {
                    return None;
                }
                let modified = entry.metadata().ok()?.modified().ok()?;
                Some((path, modified))
            })
            .collect();
        files.sort_by(|a, b| b.1.cmp(&a.1));

        files
            .into_iter()
            .filter_map(|(path, _)| match self.backup_info(&path) {
                Ok(info) => Some(info),
                Err(e) => {
                    debug!("Excluding unreadable backup {:?}: {e}", path);
                    None
                }
            })
            .collect()
    }

    /// Remove a backup file by path. Never propagates an error.
    pub fn delete_backup(&self, path: impl AsRef<Path>) -> bool {
        fs::remove_file(path.as_ref()).is_ok()
    }

    fn backup_info(&self, path: &Path) -> Result<BackupInfo> {
        let snapshot = self.read_snapshot(path)?;
        let metadata = fs::metadata(path)?;

        Ok(BackupInfo {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            file_size: metadata.len(),
            backup_time: snapshot.backup_time,
            memo_count: snapshot.memos.len(),
            user_count: snapshot.users.len(),
            version: snapshot.version,
        })
    }
}

/// File name for a snapshot taken at the given instant. Exposed for tests.
#[cfg(test)]
fn backup_file_name(at: chrono::DateTime<chrono::Local>) -> String {
    format!(
        "{BACKUP_FILE_PREFIX}{}{BACKUP_FILE_EXTENSION}",
        at.format(TIMESTAMP_FORMAT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use memoro_types::Priority;

    fn seeded_store() -> Arc<MemoStore> {
        let store = MemoStore::open_in_memory().unwrap();
        store
            .insert_memo(&Memo::new("Trip", "pack bags").with_category("Travel"))
            .unwrap();
        store
            .insert_memo(
                &Memo::new("Report", "due friday").with_priority(Priority::Urgent),
            )
            .unwrap();
        store
            .insert_user(&User::new("ada", "ada@example.com", "salt:hash"))
            .unwrap();
        Arc::new(store)
    }

    fn manager_for(store: Arc<MemoStore>) -> (BackupManager, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let manager = BackupManager::new(store, dir.path().join("backup"));
        (manager, dir)
    }

    #[test]
    fn backup_file_name_format() {
        let at = chrono::Local
            .with_ymd_and_hms(2026, 3, 14, 9, 26, 53)
            .unwrap();
        assert_eq!(backup_file_name(at), "memo_backup_2026-03-14_09-26-53.json");
    }

    #[test]
    fn backup_writes_pretty_json_snapshot() {
        let (manager, _dir) = manager_for(seeded_store());
        let path = manager.create_backup().unwrap();
        assert!(path.is_absolute());

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains('\n'));

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["memos"].as_array().unwrap().len(), 2);
        assert_eq!(json["users"].as_array().unwrap().len(), 1);
        assert!(json["backupTime"].is_i64());
    }

    #[test]
    fn round_trip_with_clear_reproduces_data() {
        let store = seeded_store();
        let (manager, _dir) = manager_for(store.clone());
        let path = manager.create_backup().unwrap();

        // Mutate after the backup so restore provably rolls back.
        store.insert_memo(&Memo::new("post-backup", "")).unwrap();

        let (snapshot, report) = manager.restore(&path, true).unwrap();
        assert_eq!(snapshot.memos.len(), 2);
        assert_eq!(report.memos_inserted, 2);
        assert!(report.is_complete());

        let titles: Vec<String> = store
            .list_memos(SortOption::TitleAsc)
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, ["Report", "Trip"]);

        // User already existed, so it was skipped rather than duplicated.
        assert_eq!(report.users_skipped, 1);
        assert_eq!(store.count_users().unwrap(), 1);
    }

    #[test]
    fn restore_assigns_fresh_ids() {
        let store = seeded_store();
        let (manager, _dir) = manager_for(store.clone());
        let path = manager.create_backup().unwrap();

        let old_ids: Vec<i64> = store
            .list_memos(SortOption::TitleAsc)
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();

        manager.restore(&path, true).unwrap();

        let new_ids: Vec<i64> = store
            .list_memos(SortOption::TitleAsc)
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert!(new_ids.iter().all(|id| !old_ids.contains(id)));
    }

    #[test]
    fn repeated_restore_duplicates_memos_but_not_users() {
        let store = seeded_store();
        let (manager, _dir) = manager_for(store.clone());
        let path = manager.create_backup().unwrap();

        manager.restore(&path, false).unwrap();
        let (_, report) = manager.restore(&path, false).unwrap();

        // 2 original + 2 per restore.
        assert_eq!(store.count_memos().unwrap(), 6);
        assert_eq!(report.memos_inserted, 2);

        assert_eq!(store.count_users().unwrap(), 1);
        assert_eq!(report.users_inserted, 0);
        assert_eq!(report.users_skipped, 1);
    }

    #[test]
    fn clear_existing_leaves_users_alone() {
        let store = seeded_store();
        let (manager, _dir) = manager_for(store.clone());
        let path = manager.create_backup().unwrap();

        store
            .insert_user(&User::new("grace", "grace@example.com", "salt:hash"))
            .unwrap();

        manager.restore(&path, true).unwrap();
        // grace was not in the snapshot, but clearing only targets memos.
        assert_eq!(store.count_users().unwrap(), 2);
    }

    #[test]
    fn restore_inserts_new_users_with_fresh_ids() {
        let store = seeded_store();
        let (manager, _dir) = manager_for(store.clone());
        let path = manager.create_backup().unwrap();

        // A second store that has never seen these users.
        let other = Arc::new(MemoStore::open_in_memory().unwrap());
        let other_manager = BackupManager::new(other.clone(), manager.backup_dir());

        let (_, report) = other_manager.restore(&path, false).unwrap();
        assert_eq!(report.users_inserted, 1);
        assert_eq!(report.users_skipped, 0);

        let ada = other.find_user_by_username("ada").unwrap().unwrap();
        assert!(ada.id > 0);
        assert_eq!(ada.password, "salt:hash");
    }

    #[test]
    fn restore_missing_file_fails() {
        let (manager, dir) = manager_for(seeded_store());
        let err = manager
            .restore(dir.path().join("nope.json"), false)
            .unwrap_err();
        assert!(matches!(err, BackupError::NotFound(_)));
    }

    #[test]
    fn restore_corrupt_file_fails() {
        let (manager, dir) = manager_for(seeded_store());
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let err = manager.restore(&path, false).unwrap_err();
        assert!(matches!(err, BackupError::Snapshot(_)));
    }

    #[test]
    fn list_backups_excludes_unparsable_files() {
        let (manager, _dir) = manager_for(seeded_store());
        let good = manager.create_backup().unwrap();

        fs::write(
            manager.backup_dir().join("memo_backup_corrupt.json"),
            "not json at all",
        )
        .unwrap();
        fs::write(manager.backup_dir().join("unrelated.txt"), "skip me").unwrap();

        let list = manager.list_backups();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].file_name, good.file_name().unwrap().to_str().unwrap());
        assert_eq!(list[0].memo_count, 2);
        assert_eq!(list[0].user_count, 1);
        assert_eq!(list[0].version, 1);
        assert!(list[0].file_size > 0);
    }

    #[test]
    fn list_backups_most_recent_first() {
        let (manager, _dir) = manager_for(seeded_store());
        fs::create_dir_all(manager.backup_dir()).unwrap();

        let older = manager.backup_dir().join("memo_backup_2026-01-01_00-00-00.json");
        let newer = manager.backup_dir().join("memo_backup_2026-02-01_00-00-00.json");
        let snapshot = serde_json::to_string(&BackupSnapshot::new(vec![], vec![])).unwrap();
        fs::write(&older, &snapshot).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        fs::write(&newer, &snapshot).unwrap();

        let list = manager.list_backups();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].path, newer);
        assert_eq!(list[1].path, older);
    }

    #[test]
    fn list_backups_with_missing_directory_is_empty() {
        let (manager, _dir) = manager_for(seeded_store());
        assert!(manager.list_backups().is_empty());
    }

    #[test]
    fn delete_backup_reports_outcome() {
        let (manager, _dir) = manager_for(seeded_store());
        let path = manager.create_backup().unwrap();

        assert!(manager.delete_backup(&path));
        assert!(!manager.delete_backup(&path));
    }
}
