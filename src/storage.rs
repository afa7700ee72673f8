//! Local key-value storage.
//!
//! The sheet persists as one JSON string under a single key. Two stores
//! are provided: [`MemoryStore`] for tests and demos, and [`FileStore`],
//! which keeps every key in one JSON map on disk.

use crate::error::StorageError;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// String key-value persistence.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store.
///
/// # Examples
///
/// ```rust
/// use diesheet::storage::{KeyValueStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.set("megaMechaState", "{}").unwrap();
/// assert_eq!(store.get("megaMechaState").unwrap().as_deref(), Some("{}"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// File-backed store holding every key in one JSON object.
///
/// The whole map is cached in memory and rewritten on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    cache: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file starts empty. An unreadable map is logged and
    /// replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let cache = match fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str::<HashMap<String, String>>(&data) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to parse storage file"
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_string_pretty(entries)?;
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, data)?;
        fs::rename(&staging, &self.path)?;
        tracing::trace!(path = %self.path.display(), keys = entries.len(), "storage persisted");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        Ok(cache.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        cache.insert(key.to_string(), value.to_string());
        self.persist(&cache)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if cache.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&cache)
    }
}
