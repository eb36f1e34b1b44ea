//! Filesystem layout for application data.

use std::path::PathBuf;

/// Locations of the database, backups, and config under one data
/// directory.
#[derive(Debug, Clone)]
pub struct AppPaths {
    data_dir: PathBuf,
}

impl AppPaths {
    /// Root all app data under the given directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// SQLite database file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("memoro.db")
    }

    /// Directory backup snapshots are written to.
    pub fn backup_dir(&self) -> PathBuf {
        self.data_dir.join("backup")
    }

    /// Key-value config file.
    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }
}

impl Default for AppPaths {
    /// `~/.memoro`.
    fn default() -> Self {
        Self::new(
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".memoro"),
        )
    }
}
