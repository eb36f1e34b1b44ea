//! User table operations.

use chrono::DateTime;
use rusqlite::params;
use tracing::debug;

use memoro_types::User;

use crate::error::{Result, StorageError};

use super::MemoStore;

const USER_COLUMNS: &str = "id, username, email, password, created_date";

impl MemoStore {
    /// Insert a new user, returning the storage-assigned id.
    ///
    /// The UNIQUE constraints on username and email surface as a
    /// [`StorageError::Database`]; uniqueness is checked by the accounts
    /// service before insert, so hitting them here means a lost race.
    pub fn insert_user(&self, user: &User) -> Result<i64> {
        let id = {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                r#"
                INSERT INTO users (username, email, password, created_date)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![
                    user.username,
                    user.email,
                    user.password,
                    user.created_date.timestamp_millis(),
                ],
            )?;
            conn.last_insert_rowid()
        };

        debug!("Inserted user {}", user.username);
        self.notify_change();
        Ok(id)
    }

    /// Look up a user by username.
    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1 LIMIT 1"
        ))?;
        let mut rows = stmt.query(params![username])?;

        if let Some(row) = rows.next()? {
            Ok(Some(Self::row_to_user(row)?))
        } else {
            Ok(None)
        }
    }

    /// Number of users with this username (0 or 1).
    pub fn count_by_username(&self, username: &str) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE username = ?1",
            params![username],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Number of users with this email (0 or 1).
    pub fn count_by_email(&self, email: &str) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE email = ?1",
            params![email],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// List all users, newest account first.
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_date DESC"
        ))?;
        let mut rows = stmt.query([])?;

        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(Self::row_to_user(row)?);
        }
        Ok(users)
    }

    fn row_to_user(row: &rusqlite::Row) -> Result<User> {
        let created_ms: i64 = row.get(4)?;
        let created_date = DateTime::from_timestamp_millis(created_ms)
            .ok_or_else(|| StorageError::InvalidData(format!("created_date {created_ms}")))?;

        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
            created_date,
        })
    }
}
