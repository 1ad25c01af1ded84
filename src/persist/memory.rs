//! In-memory storage backend.

use std::sync::{Arc, Mutex};

use hashbrown::{HashMap, HashSet};

use super::{PersistError, PersistResult, StorageBackend};

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Vec<u8>>,
    dirs: HashSet<String>,
}

/// Key/value storage held in memory.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys, directories excluded.
    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.entries.len()).unwrap_or(0)
    }

    /// True when no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_inner<T>(&self, f: impl FnOnce(&mut Inner) -> T) -> PersistResult<T> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| PersistError::Message("memory storage lock poisoned".to_string()))?;
        Ok(f(&mut inner))
    }
}

impl StorageBackend for MemoryStorage {
    fn exists(&self, key: &str) -> PersistResult<bool> {
        self.with_inner(|inner| inner.entries.contains_key(key) || inner.dirs.contains(key))
    }

    fn read(&self, key: &str) -> PersistResult<Option<Vec<u8>>> {
        self.with_inner(|inner| inner.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> PersistResult<()> {
        self.with_inner(|inner| {
            inner.entries.insert(key.to_string(), bytes.to_vec());
        })
    }

    fn delete(&mut self, key: &str) -> PersistResult<()> {
        self.with_inner(|inner| {
            inner.entries.remove(key);
        })
    }

    fn make_directory(&mut self, path: &str) -> PersistResult<()> {
        self.with_inner(|inner| {
            inner.dirs.insert(path.to_string());
        })
    }
}
