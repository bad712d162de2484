use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Session file name in the cache directory
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    username: Option<String>,
}

/// Persistent storage for the single bearer credential.
///
/// One JSON file holds the token; absence of the file means "logged
/// out". Reads have no side effects, and no format or expiry check is
/// performed locally - whether the token is still good is decided by
/// the server on the next request.
#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Read the current credential. Unreadable or corrupt state reads
    /// as absent rather than failing startup.
    pub fn get(&self) -> Option<String> {
        self.read().map(|s| s.token)
    }

    /// The username the stored credential was issued for, if recorded.
    pub fn username(&self) -> Option<String> {
        self.read().and_then(|s| s.username)
    }

    /// Persist a credential, replacing any previous one.
    pub fn store(&self, token: &str, username: &str) -> Result<()> {
        let session = StoredSession {
            token: token.to_string(),
            username: Some(username.to_string()),
        };
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&session)?;
        std::fs::write(&path, contents).context("Failed to write session file")?;
        Ok(())
    }

    /// Remove the credential. Idempotent.
    pub fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to remove session file")?;
        }
        Ok(())
    }

    fn read(&self) -> Option<StoredSession> {
        let path = self.session_path();
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return None,
        };
        match serde_json::from_str(&contents) {
            Ok(session) => Some(session),
            Err(e) => {
                debug!(error = %e, "Session file is unreadable, treating as logged out");
                None
            }
        }
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> TokenStore {
        TokenStore::new(dir.path().to_path_buf())
    }

    #[test]
    fn test_absent_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.get(), None);
        assert_eq!(store.username(), None);
    }

    #[test]
    fn test_store_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.store("tok-123", "meg").unwrap();
        assert_eq!(store.get().as_deref(), Some("tok-123"));
        assert_eq!(store.username().as_deref(), Some("meg"));
    }

    #[test]
    fn test_store_replaces_previous() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.store("old", "meg").unwrap();
        store.store("new", "meg").unwrap();
        assert_eq!(store.get().as_deref(), Some("new"));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.store("tok-123", "meg").unwrap();
        store.clear().unwrap();
        assert_eq!(store.get(), None);
        // Clearing again with nothing stored is fine
        store.clear().unwrap();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_corrupt_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(dir.path().join("session.json"), "not json").unwrap();
        assert_eq!(store.get(), None);
    }
}
