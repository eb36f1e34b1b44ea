//! Store implementation using SQLite.

mod memo_ops;
mod user_ops;

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::{Result, StorageError};

/// Current schema version.
const SCHEMA_VERSION: i32 = 1;

/// Memo and user storage backed by SQLite.
///
/// Single-writer, multi-reader: the connection sits behind a mutex, and WAL
/// mode keeps concurrent observed reads cheap. All methods are blocking;
/// callers on an async runtime should wrap them in `spawn_blocking`.
pub struct MemoStore {
    /// The SQLite connection (wrapped in Mutex for thread safety).
    pub(crate) conn: Mutex<Connection>,
    /// Data version, bumped after every successful mutation.
    changes: watch::Sender<u64>,
}

impl std::fmt::Debug for MemoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoStore")
            .field("data_version", &*self.changes.borrow())
            .finish_non_exhaustive()
    }
}

impl MemoStore {
    /// Open or create a store at the given path.
    ///
    /// Creates the database file and schema if they do not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|_| {
                    StorageError::Database(rusqlite::Error::InvalidPath(path.to_path_buf()))
                })?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
        )?;

        let store = Self::from_connection(conn)?;
        info!("Memo store opened at {:?}", path);
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self::from_connection(conn)?;
        debug!("In-memory store created");
        Ok(store)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let (changes, _) = watch::channel(0u64);
        let store = Self {
            conn: Mutex::new(conn),
            changes,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Subscribe to data-version changes.
    ///
    /// The receiver yields a new value after every successful mutation;
    /// observers re-run their query when it changes.
    pub fn watch_changes(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Bump the data version. Called by mutation ops after commit.
    pub(crate) fn notify_change(&self) {
        self.changes.send_modify(|v| *v += 1);
    }

    /// Initialize the database with pragmas and schema.
    fn initialize(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        // WAL mode for better concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        self.create_schema(&conn)?;
        Ok(())
    }

    fn create_schema(&self, conn: &Connection) -> Result<()> {
        let current_version: i32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap_or(0);

        if current_version >= SCHEMA_VERSION {
            debug!("Schema up to date (version {})", current_version);
            return Ok(());
        }

        conn.execute_batch(
            r#"
            -- Memos table: user notes with dates stored as epoch milliseconds
            CREATE TABLE IF NOT EXISTS memos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                created_date INTEGER NOT NULL,
                modified_date INTEGER NOT NULL,
                image_path TEXT,
                category TEXT NOT NULL DEFAULT 'Default',
                priority INTEGER NOT NULL DEFAULT 0
            );

            -- Dominant list order
            CREATE INDEX IF NOT EXISTS idx_memos_modified_date
                ON memos(modified_date);

            -- Category filter
            CREATE INDEX IF NOT EXISTS idx_memos_category
                ON memos(category);

            -- Users table
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                created_date INTEGER NOT NULL
            );
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        info!("Schema created (version {})", SCHEMA_VERSION);
        Ok(())
    }

    /// Total number of memos.
    pub fn count_memos(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM memos", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Total number of users.
    pub fn count_users(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
