//! Durable formation storage.
//!
//! [`FormationStore`] is the library contract. Both strategies,
//! [`directory::DirectoryFormationStore`] and
//! [`collection::CollectionFormationStore`], are written against the
//! narrow [`StorageBackend`] key/value contract and run on any backend.

pub mod collection;
pub mod directory;
pub mod fs;
pub mod memory;
pub mod sqlite;

use std::path::PathBuf;

use thiserror::Error;

use crate::formation::{FormationDraft, SavedFormation};

/// Failures of storage backends and formation stores.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// SQLite failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// JSON encoding failure.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Existing data could not be parsed and was left untouched.
    #[error("stored data under `{key}` is unreadable")]
    Corrupt {
        /// Storage key whose data was unreadable.
        key: String,
    },
    /// Any other failure.
    #[error("{0}")]
    Message(String),
}

/// Result alias for persistence calls.
pub type PersistResult<T> = Result<T, PersistError>;

/// Narrow key/value contract the formation stores are written against.
///
/// Keys are `/`-separated relative paths. Backends without a directory
/// concept accept [`StorageBackend::make_directory`] as a no-op.
pub trait StorageBackend: Send {
    /// Whether `key` names a stored value or directory.
    fn exists(&self, key: &str) -> PersistResult<bool>;
    /// Bytes under `key`, or `None` when absent.
    fn read(&self, key: &str) -> PersistResult<Option<Vec<u8>>>;
    /// Stores `bytes` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, bytes: &[u8]) -> PersistResult<()>;
    /// Deleting a missing key succeeds.
    fn delete(&mut self, key: &str) -> PersistResult<()>;
    /// Creates the directory `path`.
    fn make_directory(&mut self, _path: &str) -> PersistResult<()> {
        Ok(())
    }
}

/// Saved-formation library contract shared by every storage strategy.
///
/// Reads never fail: unreadable records are logged and treated as absent.
/// Writes report errors and leave the listing untouched when they fail.
pub trait FormationStore: Send {
    /// Persists a new formation at the front of the listing.
    fn save(&mut self, draft: FormationDraft) -> PersistResult<SavedFormation>;

    /// The formation with `id`, or `None` when unknown or unreadable.
    fn load(&self, id: &str) -> Option<SavedFormation>;

    /// All readable formations, most recent first.
    fn list(&self) -> Vec<SavedFormation>;

    /// Returns whether a formation was removed; unknown ids are not errors.
    fn remove(&mut self, id: &str) -> PersistResult<bool>;

    /// Returns whether a formation was renamed; unknown ids are not errors.
    fn rename(&mut self, id: &str, new_name: &str) -> PersistResult<bool>;
}

/// Startup choice of where saved formations live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// One JSON file per formation plus an id index under `root`.
    Directory {
        /// Application documents directory.
        root: PathBuf,
    },
    /// Whole collection as one blob in a SQLite key/value table.
    Sqlite {
        /// Database file.
        path: PathBuf,
    },
    /// Whole collection as one blob held in memory.
    InMemory,
}

/// Opens the formation store selected by `config`.
pub fn open_formation_store(config: &BackendConfig) -> PersistResult<Box<dyn FormationStore>> {
    log::info!("opening formation store: {config:?}");
    let store: Box<dyn FormationStore> = match config {
        BackendConfig::Directory { root } => Box::new(directory::DirectoryFormationStore::new(
            fs::FsStorage::open(root)?,
        )),
        BackendConfig::Sqlite { path } => Box::new(collection::CollectionFormationStore::new(
            sqlite::SqliteStorage::open(path)?,
        )),
        BackendConfig::InMemory => Box::new(collection::CollectionFormationStore::new(
            memory::MemoryStorage::new(),
        )),
    };
    Ok(store)
}

/// Ids become file names, so only plain alphanumerics are accepted.
pub(crate) fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}
