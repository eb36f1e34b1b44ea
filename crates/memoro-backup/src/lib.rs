//! Backup and restore for the memoro data set.
//!
//! A backup is a self-describing JSON snapshot of every memo and user,
//! written to a timestamped file in a dedicated directory. Restore merges a
//! snapshot back into storage: users are de-duplicated by username, memos
//! are always re-inserted with fresh ids. Per-record failures never abort a
//! restore; the returned [`RestoreReport`] carries the per-table outcome
//! counts.

pub mod error;
pub mod manager;
pub mod snapshot;

pub use error::{BackupError, Result};
pub use manager::{BackupManager, RestoreReport};
pub use snapshot::{BackupInfo, BackupSnapshot, SNAPSHOT_VERSION};
