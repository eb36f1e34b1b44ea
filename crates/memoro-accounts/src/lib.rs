//! Registration and login.
//!
//! Passwords are stored as `salt:hash`: a random hex salt and the SHA-256
//! digest of password+salt. Username and email uniqueness is checked before
//! insert (check-then-insert; the store's UNIQUE constraints backstop the
//! race).

pub mod error;
pub mod password;
pub mod service;

pub use error::{AccountError, Result};
pub use service::AccountService;
