//! Account registration and login.

use std::sync::Arc;

use tracing::info;

use memoro_store::MemoStore;
use memoro_types::User;

use crate::error::{AccountError, Result};
use crate::password::{encrypt_password, verify_password};

/// Registration and login over the user table.
pub struct AccountService {
    store: Arc<MemoStore>,
}

impl AccountService {
    pub fn new(store: Arc<MemoStore>) -> Self {
        Self { store }
    }

    /// Register a new account, returning the storage-assigned id.
    ///
    /// Rejects duplicate usernames and emails before inserting.
    pub fn register(&self, username: &str, password: &str, email: &str) -> Result<i64> {
        if self.store.count_by_username(username)? > 0 {
            return Err(AccountError::UsernameTaken);
        }
        if self.store.count_by_email(email)? > 0 {
            return Err(AccountError::EmailTaken);
        }

        let user = User::new(username, email, encrypt_password(password));
        let id = self.store.insert_user(&user)?;
        info!("Registered user {username}");
        Ok(id)
    }

    /// Log in with username and password.
    pub fn login(&self, username: &str, password: &str) -> Result<User> {
        let user = self
            .store
            .find_user_by_username(username)?
            .ok_or(AccountError::InvalidCredentials)?;

        if verify_password(password, &user.password) {
            Ok(user)
        } else {
            Err(AccountError::InvalidCredentials)
        }
    }

    /// Look up an account by username.
    pub fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.store.find_user_by_username(username)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AccountService {
        AccountService::new(Arc::new(MemoStore::open_in_memory().unwrap()))
    }

    #[test]
    fn register_then_login() {
        let service = service();
        let id = service
            .register("ada", "enchantress", "ada@example.com")
            .unwrap();
        assert!(id > 0);

        let user = service.login("ada", "enchantress").unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.email, "ada@example.com");
        // Stored digest, never the plaintext.
        assert_ne!(user.password, "enchantress");
        assert!(user.password.contains(':'));
    }

    #[test]
    fn duplicate_username_rejected() {
        let service = service();
        service.register("ada", "pw", "ada@example.com").unwrap();
        let err = service
            .register("ada", "pw", "other@example.com")
            .unwrap_err();
        assert!(matches!(err, AccountError::UsernameTaken));
    }

    #[test]
    fn duplicate_email_rejected() {
        let service = service();
        service.register("ada", "pw", "ada@example.com").unwrap();
        let err = service
            .register("grace", "pw", "ada@example.com")
            .unwrap_err();
        assert!(matches!(err, AccountError::EmailTaken));
    }

    #[test]
    fn wrong_password_and_unknown_user_are_indistinguishable() {
        let service = service();
        service.register("ada", "pw", "ada@example.com").unwrap();

        let wrong_pw = service.login("ada", "nope").unwrap_err();
        let unknown = service.login("grace", "pw").unwrap_err();
        assert_eq!(wrong_pw.to_string(), unknown.to_string());
    }
}
