//! Durable client-side session persistence.
//!
//! Two mechanisms exist and must be kept in lockstep by the session store:
//! a key-value storage holding the `token` and `user` entries, and a
//! navigation cookie consumed by an external route-gating layer. The CLI
//! realizes the first as a JSON file and the second as a cookie file in
//! Set-Cookie syntax.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key for the JSON-serialized doctor profile.
pub const USER_KEY: &str = "user";
/// Navigation cookie lifetime: 3 days, matching the backend token expiry.
pub const COOKIE_MAX_AGE: u32 = 259_200;

/// Key-value storage surviving process restarts.
///
/// The API is deliberately infallible: persistence failures are logged and
/// swallowed so that `logout()` can honor its never-fails contract.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Sink for the `token` navigation cookie.
pub trait CookieSink: Send + Sync {
    fn set_token(&self, token: &str);
    fn clear_token(&self);
    fn token(&self) -> Option<String>;
}

/// File-backed storage: a small JSON object of string entries.
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Opens the storage file, starting empty when it is missing or
    /// unreadable. A corrupt file is treated as empty rather than fatal.
    pub fn open(path: PathBuf) -> Self {
        let entries = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str::<HashMap<String, String>>(&raw).ok())
            .unwrap_or_default();
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                tracing::warn!(target: "medthing_cli::storage", error = %err, path = %parent.display(), "Failed to create session directory");
                return;
            }
        }
        match serde_json::to_string_pretty(entries) {
            Ok(raw) => {
                if let Err(err) = fs::write(&self.path, raw) {
                    tracing::warn!(target: "medthing_cli::storage", error = %err, path = %self.path.display(), "Failed to persist session storage");
                }
            }
            Err(err) => {
                tracing::warn!(target: "medthing_cli::storage", error = %err, "Failed to serialize session storage");
            }
        }
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap();
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}

/// Cookie file in Set-Cookie syntax, path `/`, 3-day max age.
pub struct FileCookieSink {
    path: PathBuf,
}

impl FileCookieSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CookieSink for FileCookieSink {
    fn set_token(&self, token: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                tracing::warn!(target: "medthing_cli::storage", error = %err, path = %parent.display(), "Failed to create session directory");
                return;
            }
        }
        let line = format!("token={}; Path=/; Max-Age={}\n", token, COOKIE_MAX_AGE);
        if let Err(err) = fs::write(&self.path, line) {
            tracing::warn!(target: "medthing_cli::storage", error = %err, path = %self.path.display(), "Failed to write navigation cookie");
        }
    }

    fn clear_token(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(target: "medthing_cli::storage", error = %err, path = %self.path.display(), "Failed to clear navigation cookie");
            }
        }
    }

    fn token(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let rest = raw.trim().strip_prefix("token=")?;
        let token = rest.split(';').next().unwrap_or_default().trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }
}

/// In-memory cookie sink for tests.
#[derive(Default)]
pub struct MemoryCookieSink {
    token: Mutex<Option<String>>,
}

impl MemoryCookieSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieSink for MemoryCookieSink {
    fn set_token(&self, token: &str) {
        *self.token.lock().unwrap() = Some(token.to_string());
    }

    fn clear_token(&self) {
        *self.token.lock().unwrap() = None;
    }

    fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_storage_round_trips_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let storage = FileStorage::open(path.clone());
        storage.set(TOKEN_KEY, "abc");
        storage.set(USER_KEY, "{\"id\":\"1\"}");
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("abc"));

        // A fresh handle reads what the first one persisted.
        let reopened = FileStorage::open(path);
        assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("abc"));
        assert_eq!(reopened.get(USER_KEY).as_deref(), Some("{\"id\":\"1\"}"));
    }

    #[test]
    fn file_storage_tolerates_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json at all").unwrap();

        let storage = FileStorage::open(path);
        assert!(storage.get(TOKEN_KEY).is_none());
    }

    #[test]
    fn file_storage_remove_clears_entry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let storage = FileStorage::open(path.clone());
        storage.set(TOKEN_KEY, "abc");
        storage.remove(TOKEN_KEY);
        assert!(storage.get(TOKEN_KEY).is_none());

        let reopened = FileStorage::open(path);
        assert!(reopened.get(TOKEN_KEY).is_none());
    }

    #[test]
    fn file_cookie_sink_writes_set_cookie_syntax() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cookies.txt");

        let sink = FileCookieSink::new(path.clone());
        sink.set_token("abc");

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw.trim(), "token=abc; Path=/; Max-Age=259200");
        assert_eq!(sink.token().as_deref(), Some("abc"));

        sink.clear_token();
        assert!(sink.token().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn file_cookie_sink_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let sink = FileCookieSink::new(dir.path().join("cookies.txt"));
        sink.clear_token();
        sink.clear_token();
        assert!(sink.token().is_none());
    }
}
