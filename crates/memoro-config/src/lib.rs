//! API credential storage.
//!
//! A single JSON key-value file holds the externally-settable DeepSeek API
//! key. Keys are format-validated before they are stored; the file and its
//! directory are created on first write.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

/// Storage key for the DeepSeek API credential.
const API_KEY_ENTRY: &str = "deepseek_api_key";

/// Minimum accepted credential length.
const API_KEY_MIN_LEN: usize = 10;

/// Required credential prefix.
const API_KEY_PREFIX: &str = "sk-";

/// Errors from the configuration store.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem read/write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file contents could not be parsed.
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Credential failed format validation.
    #[error("Invalid API key format: expected an \"sk-\" key of at least 10 characters")]
    InvalidKeyFormat,
}

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Validate an API credential's format: trimmed length at least 10 and an
/// `sk-` prefix.
pub fn validate_api_key(key: &str) -> Result<()> {
    let key = key.trim();
    if key.len() >= API_KEY_MIN_LEN && key.starts_with(API_KEY_PREFIX) {
        Ok(())
    } else {
        Err(ConfigError::InvalidKeyFormat)
    }
}

/// Key-value app configuration backed by one JSON file.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Use the given file as the config store.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location: `~/.memoro/config.json`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".memoro")
            .join("config.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored API key, if any.
    ///
    /// A missing or unreadable config file reads as "not configured".
    pub fn api_key(&self) -> Option<String> {
        match self.load() {
            Ok(map) => map.get(API_KEY_ENTRY).cloned(),
            Err(e) => {
                warn!("Could not read config file {:?}: {e}", self.path);
                None
            }
        }
    }

    /// Whether a non-blank API key is stored.
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some_and(|k| !k.trim().is_empty())
    }

    /// Validate and store the API key.
    pub fn set_api_key(&self, key: &str) -> Result<()> {
        validate_api_key(key)?;
        let mut map = self.load()?;
        map.insert(API_KEY_ENTRY.to_string(), key.trim().to_string());
        self.save(&map)
    }

    /// Remove the stored API key.
    pub fn clear_api_key(&self) -> Result<()> {
        let mut map = self.load()?;
        if map.remove(API_KEY_ENTRY).is_some() {
            self.save(&map)?;
        }
        Ok(())
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> ConfigStore {
        ConfigStore::new(dir.path().join("nested").join("config.json"))
    }

    #[test]
    fn key_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.api_key().is_none());
        assert!(!store.is_configured());

        store.set_api_key("sk-0123456789").unwrap();
        assert_eq!(store.api_key().as_deref(), Some("sk-0123456789"));
        assert!(store.is_configured());

        store.clear_api_key().unwrap();
        assert!(store.api_key().is_none());
    }

    #[test]
    fn set_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set_api_key("sk-0123456789").unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn key_is_trimmed_before_storage() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set_api_key("  sk-0123456789  ").unwrap();
        assert_eq!(store.api_key().as_deref(), Some("sk-0123456789"));
    }

    #[test]
    fn format_validation() {
        assert!(validate_api_key("sk-0123456789").is_ok());
        // Too short.
        assert!(matches!(
            validate_api_key("sk-123"),
            Err(ConfigError::InvalidKeyFormat)
        ));
        // Wrong prefix.
        assert!(matches!(
            validate_api_key("api-0123456789"),
            Err(ConfigError::InvalidKeyFormat)
        ));
        assert!(matches!(
            validate_api_key(""),
            Err(ConfigError::InvalidKeyFormat)
        ));
    }

    #[test]
    fn invalid_key_is_not_stored() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.set_api_key("bad").is_err());
        assert!(store.api_key().is_none());
    }

    #[test]
    fn other_entries_survive_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set_api_key("sk-0123456789").unwrap();

        // Simulate an unrelated setting in the same file.
        let mut map = store.load().unwrap();
        map.insert("theme".to_string(), "dark".to_string());
        store.save(&map).unwrap();

        store.clear_api_key().unwrap();
        let map = store.load().unwrap();
        assert_eq!(map.get("theme").map(String::as_str), Some("dark"));
        assert!(!map.contains_key("deepseek_api_key"));
    }
}
