//! Memo CRUD, list, search, and category operations.

use chrono::DateTime;
use rusqlite::params;
use tracing::debug;

use memoro_types::{Memo, Priority, SortOption};

use crate::error::{Result, StorageError};

use super::MemoStore;

const MEMO_COLUMNS: &str =
    "id, title, content, created_date, modified_date, image_path, category, priority";

/// ORDER BY clause for a top-level list.
fn order_clause(sort: SortOption) -> &'static str {
    match sort {
        SortOption::ModifiedDateDesc => "modified_date DESC",
        SortOption::ModifiedDateAsc => "modified_date ASC",
        SortOption::CreatedDateDesc => "created_date DESC",
        SortOption::CreatedDateAsc => "created_date ASC",
        SortOption::TitleAsc => "title ASC",
        SortOption::TitleDesc => "title DESC",
        SortOption::PriorityDesc => "priority DESC, modified_date DESC",
        SortOption::PriorityAsc => "priority ASC, modified_date DESC",
        SortOption::CategoryAsc => "category ASC, modified_date DESC",
    }
}

/// ORDER BY clause for a category-scoped list.
///
/// Within a single category the category sort is meaningless, so it
/// degrades to modified date descending.
fn scoped_order_clause(sort: SortOption) -> &'static str {
    match sort {
        SortOption::CategoryAsc => "modified_date DESC",
        other => order_clause(other),
    }
}

impl MemoStore {
    /// Insert a new memo, returning the storage-assigned id.
    ///
    /// Any id on the input value is ignored.
    pub fn insert_memo(&self, memo: &Memo) -> Result<i64> {
        let id = {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                r#"
                INSERT INTO memos (title, content, created_date, modified_date, image_path, category, priority)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    memo.title,
                    memo.content,
                    memo.created_date.timestamp_millis(),
                    memo.modified_date.timestamp_millis(),
                    memo.image_path,
                    memo.category,
                    memo.priority.as_i64(),
                ],
            )?;
            conn.last_insert_rowid()
        };

        debug!("Inserted memo {}", id);
        self.notify_change();
        Ok(id)
    }

    /// Update a memo by id.
    pub fn update_memo(&self, memo: &Memo) -> Result<()> {
        let rows_affected = {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                r#"
                UPDATE memos
                SET title = ?2, content = ?3, created_date = ?4, modified_date = ?5,
                    image_path = ?6, category = ?7, priority = ?8
                WHERE id = ?1
                "#,
                params![
                    memo.id,
                    memo.title,
                    memo.content,
                    memo.created_date.timestamp_millis(),
                    memo.modified_date.timestamp_millis(),
                    memo.image_path,
                    memo.category,
                    memo.priority.as_i64(),
                ],
            )?
        };

        if rows_affected == 0 {
            return Err(StorageError::NotFound(format!("Memo {}", memo.id)));
        }

        self.notify_change();
        Ok(())
    }

    /// Delete a memo.
    pub fn delete_memo(&self, memo: &Memo) -> Result<bool> {
        self.delete_memo_by_id(memo.id)
    }

    /// Delete a memo by id.
    pub fn delete_memo_by_id(&self, id: i64) -> Result<bool> {
        let rows_affected = {
            let conn = self.conn.lock().unwrap();
            conn.execute("DELETE FROM memos WHERE id = ?1", params![id])?
        };

        if rows_affected > 0 {
            self.notify_change();
        }
        Ok(rows_affected > 0)
    }

    /// Delete every memo, returning how many were removed.
    pub fn delete_all_memos(&self) -> Result<usize> {
        let rows_affected = {
            let conn = self.conn.lock().unwrap();
            conn.execute("DELETE FROM memos", [])?
        };

        if rows_affected > 0 {
            self.notify_change();
        }
        Ok(rows_affected)
    }

    /// Get a memo by id.
    pub fn get_memo(&self, id: i64) -> Result<Option<Memo>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt =
            conn.prepare(&format!("SELECT {MEMO_COLUMNS} FROM memos WHERE id = ?1"))?;
        let mut rows = stmt.query(params![id])?;

        if let Some(row) = rows.next()? {
            Ok(Some(Self::row_to_memo(row)?))
        } else {
            Ok(None)
        }
    }

    /// List all memos in the given sort order.
    pub fn list_memos(&self, sort: SortOption) -> Result<Vec<Memo>> {
        let conn = self.conn.lock().unwrap();

        let sql = format!(
            "SELECT {MEMO_COLUMNS} FROM memos ORDER BY {}",
            order_clause(sort)
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;

        let mut memos = Vec::new();
        while let Some(row) = rows.next()? {
            memos.push(Self::row_to_memo(row)?);
        }
        Ok(memos)
    }

    /// List memos in one category, in the given sort order.
    pub fn list_memos_by_category(&self, category: &str, sort: SortOption) -> Result<Vec<Memo>> {
        let conn = self.conn.lock().unwrap();

        let sql = format!(
            "SELECT {MEMO_COLUMNS} FROM memos WHERE category = ?1 ORDER BY {}",
            scoped_order_clause(sort)
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params![category])?;

        let mut memos = Vec::new();
        while let Some(row) = rows.next()? {
            memos.push(Self::row_to_memo(row)?);
        }
        Ok(memos)
    }

    /// Substring search over title or content, newest modification first.
    pub fn search_memos(&self, query: &str) -> Result<Vec<Memo>> {
        let conn = self.conn.lock().unwrap();

        let pattern = format!("%{}%", query);
        let sql = format!(
            r#"
            SELECT {MEMO_COLUMNS} FROM memos
            WHERE title LIKE ?1 OR content LIKE ?1
            ORDER BY modified_date DESC
            "#
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params![pattern])?;

        let mut memos = Vec::new();
        while let Some(row) = rows.next()? {
            memos.push(Self::row_to_memo(row)?);
        }
        Ok(memos)
    }

    /// Substring search restricted to one category.
    pub fn search_memos_by_category(&self, category: &str, query: &str) -> Result<Vec<Memo>> {
        let conn = self.conn.lock().unwrap();

        let pattern = format!("%{}%", query);
        let sql = format!(
            r#"
            SELECT {MEMO_COLUMNS} FROM memos
            WHERE category = ?1 AND (title LIKE ?2 OR content LIKE ?2)
            ORDER BY modified_date DESC
            "#
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params![category, pattern])?;

        let mut memos = Vec::new();
        while let Some(row) = rows.next()? {
            memos.push(Self::row_to_memo(row)?);
        }
        Ok(memos)
    }

    /// Distinct categories currently present, ascending.
    pub fn distinct_categories(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt =
            conn.prepare("SELECT DISTINCT category FROM memos ORDER BY category ASC")?;
        let mut rows = stmt.query([])?;

        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(row.get(0)?);
        }
        Ok(categories)
    }

    /// Convert a database row to a Memo struct.
    pub(crate) fn row_to_memo(row: &rusqlite::Row) -> Result<Memo> {
        let created_ms: i64 = row.get(3)?;
        let modified_ms: i64 = row.get(4)?;

        let created_date = DateTime::from_timestamp_millis(created_ms)
            .ok_or_else(|| StorageError::InvalidData(format!("created_date {created_ms}")))?;
        let modified_date = DateTime::from_timestamp_millis(modified_ms)
            .ok_or_else(|| StorageError::InvalidData(format!("modified_date {modified_ms}")))?;

        Ok(Memo {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            created_date,
            modified_date,
            image_path: row.get(5)?,
            category: row.get(6)?,
            priority: Priority::from_i64(row.get(7)?),
        })
    }
}
