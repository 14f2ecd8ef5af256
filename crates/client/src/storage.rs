//! Session-scoped key/value storage.
//!
//! Mirrors the browser's `sessionStorage`: string keys, string values, lost
//! when the session ends. Used only to carry state across the login redirect.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;

/// Storage keys written around the login redirect.
pub mod keys {
    /// URL fragment to return to once logged in (e.g. `#order`).
    pub const REDIRECT_AFTER_LOGIN: &str = "redirectAfterLogin";

    /// Order payload captured when the server required login.
    pub const PENDING_ORDER: &str = "pendingOrder";

    /// Private-room form captured when the server required login.
    pub const PENDING_PRIVATE_ROOM: &str = "pendingPrivateRoom";

    /// Event form captured when the server required login.
    pub const PENDING_EVENT: &str = "pendingEvent";
}

/// Errors raised while persisting session values.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session file I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session file {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode session values for {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Session-scoped string storage.
pub trait SessionStorage {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStorage {
    values: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemorySessionStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored pair.
    #[must_use]
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.values.borrow().clone()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

/// Storage persisted to a JSON object on disk.
///
/// Lets a terminal session survive between invocations the way a browser tab
/// survives a navigation. The file is rewritten on every change.
#[derive(Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
    values: RefCell<BTreeMap<String, String>>,
}

impl FileSessionStorage {
    /// Open (or lazily create) the session file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|source| StorageError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        Ok(Self {
            path,
            values: RefCell::new(values),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        let text = serde_json::to_string_pretty(&*self.values.borrow()).map_err(|source| {
            StorageError::Encode {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, text).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl SessionStorage for FileSessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        self.flush()
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.values.borrow_mut().remove(key).is_none() {
            return Ok(());
        }
        self.flush()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bistro-{name}-{}.json", std::process::id()))
    }

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemorySessionStorage::new();
        storage.set(keys::REDIRECT_AFTER_LOGIN, "#order").unwrap();
        assert_eq!(
            storage.get(keys::REDIRECT_AFTER_LOGIN).as_deref(),
            Some("#order")
        );
        storage.remove(keys::REDIRECT_AFTER_LOGIN).unwrap();
        assert!(storage.get(keys::REDIRECT_AFTER_LOGIN).is_none());
    }

    #[test]
    fn test_memory_storage_clones_share_state() {
        let storage = MemorySessionStorage::new();
        let handle = storage.clone();
        storage.set("k", "v").unwrap();
        assert_eq!(handle.get("k").as_deref(), Some("v"));
        assert_eq!(handle.entries().len(), 1);
    }

    #[test]
    fn test_file_storage_persists_between_opens() {
        let path = temp_path("persist");
        let _ = std::fs::remove_file(&path);

        let storage = FileSessionStorage::open(&path).unwrap();
        assert!(storage.get(keys::PENDING_ORDER).is_none());
        storage.set(keys::PENDING_ORDER, "{\"total\":1}").unwrap();
        storage.set(keys::REDIRECT_AFTER_LOGIN, "#order").unwrap();
        storage.remove(keys::REDIRECT_AFTER_LOGIN).unwrap();

        let reopened = FileSessionStorage::open(&path).unwrap();
        assert_eq!(
            reopened.get(keys::PENDING_ORDER).as_deref(),
            Some("{\"total\":1}")
        );
        assert!(reopened.get(keys::REDIRECT_AFTER_LOGIN).is_none());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_file_storage_rejects_corrupt_file() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            FileSessionStorage::open(&path),
            Err(StorageError::Corrupt { .. })
        ));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_failure_is_not_reported_as_corrupt() {
        let path = temp_path("missing-dir").join("session.json");
        let storage = FileSessionStorage::open(&path).unwrap();

        assert!(matches!(
            storage.set(keys::PENDING_EVENT, "{}"),
            Err(StorageError::Io { .. })
        ));
    }

    #[test]
    fn test_encode_error_message() {
        let err = StorageError::Encode {
            path: PathBuf::from("session.json"),
            source: serde_json::from_str::<u8>("x").unwrap_err(),
        };
        let message = err.to_string();
        assert!(message.starts_with("could not encode session values for session.json"));
        assert!(!message.contains("not valid JSON"));
    }
}
