//! Session store
//!
//! Durable holder of the authenticated user between runs. The file store
//! keeps a small JSON key-value document with a single `"user"` entry.

use crate::error::{ClientError, ClientResult};
use crate::models::Session;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key under which the session record is stored
pub const SESSION_KEY: &str = "user";

/// Persists the authenticated user's identity
pub trait SessionStore: Send + Sync {
    /// Persist the user record, replacing any previous one
    fn save_session(&self, session: &Session) -> ClientResult<()>;

    /// Stored record, or `None` when no one is logged in
    fn load_session(&self) -> ClientResult<Option<Session>>;

    /// Remove the stored record; no-op when absent
    fn clear_session(&self) -> ClientResult<()>;
}

/// Default location of the session file
pub fn default_session_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("bankdash").join("session.json"))
        .unwrap_or_else(|| PathBuf::from("./bankdash_session.json"))
}

/// JSON-file backed session store
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> ClientResult<Map<String, Value>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(io_error(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) | Err(_) => {
                tracing::warn!(path = ?self.path, "Session file is not a JSON object, ignoring it");
                Ok(Map::new())
            }
        }
    }

    fn write_document(&self, document: &Map<String, Value>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
            }
        }

        let content = serde_json::to_string_pretty(document)
            .map_err(|e| ClientError::Session(e.to_string()))?;

        // Write then rename so a crash never leaves a torn file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|e| io_error(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| io_error(&self.path, e))?;
        Ok(())
    }
}

fn io_error(path: &Path, error: std::io::Error) -> ClientError {
    ClientError::Session(format!("{:?}: {}", path, error))
}

impl SessionStore for FileSessionStore {
    fn save_session(&self, session: &Session) -> ClientResult<()> {
        let mut document = self.read_document()?;
        let record = serde_json::to_value(session).map_err(|e| ClientError::Session(e.to_string()))?;
        document.insert(SESSION_KEY.to_string(), record);
        self.write_document(&document)?;

        tracing::debug!(user_id = session.id, path = ?self.path, "Session saved");
        Ok(())
    }

    fn load_session(&self) -> ClientResult<Option<Session>> {
        let mut document = self.read_document()?;
        let Some(record) = document.remove(SESSION_KEY) else {
            return Ok(None);
        };

        match serde_json::from_value(record) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(error = %e, "Stored session is unreadable, treating as logged out");
                Ok(None)
            }
        }
    }

    fn clear_session(&self) -> ClientResult<()> {
        let mut document = self.read_document()?;
        if document.remove(SESSION_KEY).is_none() {
            return Ok(());
        }

        if document.is_empty() {
            match std::fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(io_error(&self.path, e)),
            }
        } else {
            self.write_document(&document)?;
        }

        tracing::debug!(path = ?self.path, "Session cleared");
        Ok(())
    }
}

/// In-memory session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn save_session(&self, session: &Session) -> ClientResult<()> {
        let mut slot = self
            .session
            .lock()
            .map_err(|e| ClientError::Session(e.to_string()))?;
        *slot = Some(session.clone());
        Ok(())
    }

    fn load_session(&self) -> ClientResult<Option<Session>> {
        let slot = self
            .session
            .lock()
            .map_err(|e| ClientError::Session(e.to_string()))?;
        Ok(slot.clone())
    }

    fn clear_session(&self) -> ClientResult<()> {
        let mut slot = self
            .session
            .lock()
            .map_err(|e| ClientError::Session(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn alice() -> Session {
        Session {
            id: 3,
            username: "alice".to_string(),
            email: None,
        }
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));

        assert_eq!(store.load_session().unwrap(), None);

        store.save_session(&alice()).unwrap();
        assert_eq!(store.load_session().unwrap(), Some(alice()));

        store.clear_session().unwrap();
        assert_eq!(store.load_session().unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_uses_fixed_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileSessionStore::new(&path);
        store.save_session(&alice()).unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[SESSION_KEY]["username"], "alice");
        assert_eq!(raw[SESSION_KEY]["id"], 3);
    }

    #[test]
    fn test_clear_absent_session_is_noop() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        assert!(store.clear_session().is_ok());
    }

    #[test]
    fn test_corrupt_file_reads_as_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileSessionStore::new(&path);
        assert_eq!(store.load_session().unwrap(), None);
    }

    #[test]
    fn test_clear_keeps_other_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let store = FileSessionStore::new(&path);
        store.save_session(&alice()).unwrap();
        store.clear_session().unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert!(raw.get(SESSION_KEY).is_none());
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySessionStore::new();
        assert_eq!(store.load_session().unwrap(), None);
        store.save_session(&alice()).unwrap();
        assert_eq!(store.load_session().unwrap(), Some(alice()));
        store.clear_session().unwrap();
        assert_eq!(store.load_session().unwrap(), None);
    }
}
