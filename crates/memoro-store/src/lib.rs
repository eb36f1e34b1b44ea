//! SQLite-backed storage for memoro.
//!
//! The [`MemoStore`] owns the canonical memo and user records. It is an
//! explicitly constructed value: the application's composition root creates
//! one and passes it down; there is no global handle.
//!
//! Reads are plain queries; "live" behavior comes from the data-version
//! channel: every successful mutation bumps a [`tokio::sync::watch`] counter,
//! and observers re-run their query whenever it changes.
//!
//! # Usage
//!
//! ```no_run
//! use memoro_store::MemoStore;
//! use memoro_types::{Memo, SortOption};
//!
//! let store = MemoStore::open("~/.memoro/memoro.db")?;
//! let id = store.insert_memo(&Memo::new("Groceries", "milk, eggs"))?;
//! let all = store.list_memos(SortOption::ModifiedDateDesc)?;
//! assert_eq!(all[0].id, id);
//! # Ok::<(), memoro_store::StorageError>(())
//! ```

pub mod error;
pub mod store;

pub use error::{Result, StorageError};
pub use store::MemoStore;
