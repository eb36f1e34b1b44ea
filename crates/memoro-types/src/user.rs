//! User account record.

use serde::{Deserialize, Serialize};

use crate::{Timestamp, UNASSIGNED_ID, now};

/// An account.
///
/// `username` and `email` are unique (enforced by the accounts service
/// before insert). `password` holds a `salt:hash` digest, never plaintext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_date: Timestamp,
}

impl User {
    /// Create a new unpersisted user with an already-digested password.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_digest: impl Into<String>,
    ) -> Self {
        Self {
            id: UNASSIGNED_ID,
            username: username.into(),
            email: email.into(),
            password: password_digest.into(),
            created_date: now(),
        }
    }
}
