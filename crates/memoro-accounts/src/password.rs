//! Salted password digests.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Salt length in bytes (hex-encoded to twice this many characters).
const SALT_LEN: usize = 16;

/// Digest a password with a fresh random salt, producing `salt:hash`.
pub fn encrypt_password(password: &str) -> String {
    let salt = generate_salt();
    let hash = hash_password(password, &salt);
    format!("{salt}:{hash}")
}

/// Check a password against a stored `salt:hash` value.
///
/// Malformed stored values verify as false rather than erroring.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, stored_hash)) = stored.split_once(':') else {
        return false;
    };
    hash_password(password, salt) == stored_hash
}

fn generate_salt() -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    hex::encode(salt)
}

fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}
