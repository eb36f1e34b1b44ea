//! memoro, a note-taking core.
//!
//! Memos live in a SQLite store; list screens subscribe to a
//! [`QueryComposer`] that keeps exactly one live query for the current
//! search/category/sort state; the full data set can be exported to and
//! restored from JSON snapshots; and an optional AI adapter suggests a
//! category for new memos.
//!
//! [`App`] is the composition root: it owns the store and every service
//! and is the only place they are wired together.
//!
//! ```no_run
//! use memoro::{App, AppPaths, MemoDraft};
//!
//! # async fn run() -> Result<(), memoro::AppError> {
//! let app = App::new(AppPaths::default())?;
//! app.create_memo(&MemoDraft::new("Groceries", "milk, eggs"))?;
//!
//! let composer = app.composer();
//! composer.set_search("milk");
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod error;
pub mod logging;
pub mod paths;

pub use app::{App, MemoDraft};
pub use error::AppError;
pub use paths::AppPaths;

// The domain vocabulary, re-exported for callers of the facade.
pub use memoro_accounts::AccountService;
pub use memoro_backup::{BackupInfo, BackupManager, BackupSnapshot, RestoreReport};
pub use memoro_config::ConfigStore;
pub use memoro_llm::CategorySuggester;
pub use memoro_query::QueryComposer;
pub use memoro_store::MemoStore;
pub use memoro_types::{CategorySuggestion, Memo, Priority, SortOption, User};
