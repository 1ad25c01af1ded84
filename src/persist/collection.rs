//! Formation store keeping the whole collection under one key.

use crate::formation::{FormationDraft, SavedFormation, now_millis};

use super::{FormationStore, PersistError, PersistResult, StorageBackend};

/// Default key for the serialized collection.
pub const COLLECTION_KEY: &str = "saved_formations";

/// [`FormationStore`] serializing every formation into a single blob,
/// most recent first.
///
/// Each write replaces the blob in one backend call, so a failed write
/// leaves the previous collection intact. An unreadable blob lists as
/// empty but is never overwritten.
pub struct CollectionFormationStore<S> {
    storage: S,
    key: String,
}

impl<S: StorageBackend> CollectionFormationStore<S> {
    /// Store under the default [`COLLECTION_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, COLLECTION_KEY)
    }

    /// Store under a custom key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Underlying backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn read_all(&self) -> PersistResult<Vec<SavedFormation>> {
        let Some(bytes) = self.storage.read(&self.key)? else {
            return Ok(Vec::new());
        };
        serde_json::from_slice(&bytes).map_err(|err| {
            log::warn!("formation collection `{}` is corrupt: {err}", self.key);
            PersistError::Corrupt {
                key: self.key.clone(),
            }
        })
    }

    fn write_all(&mut self, formations: &[SavedFormation]) -> PersistResult<()> {
        let bytes = serde_json::to_vec(formations)?;
        self.storage.write(&self.key, &bytes)
    }
}

impl<S: StorageBackend> FormationStore for CollectionFormationStore<S> {
    fn save(&mut self, draft: FormationDraft) -> PersistResult<SavedFormation> {
        let mut all = self.read_all()?;
        let formation = SavedFormation::create(draft, now_millis());
        all.insert(0, formation.clone());
        self.write_all(&all)?;

        log::info!("saved formation {} ({:?})", formation.id, formation.name);
        Ok(formation)
    }

    fn load(&self, id: &str) -> Option<SavedFormation> {
        self.list().into_iter().find(|f| f.id == id)
    }

    fn list(&self) -> Vec<SavedFormation> {
        self.read_all().unwrap_or_else(|err| {
            log::warn!("listing formations failed: {err}");
            Vec::new()
        })
    }

    fn remove(&mut self, id: &str) -> PersistResult<bool> {
        let mut all = self.read_all()?;
        let before = all.len();
        all.retain(|f| f.id != id);
        if all.len() == before {
            return Ok(false);
        }
        self.write_all(&all)?;
        log::info!("removed formation {id}");
        Ok(true)
    }

    fn rename(&mut self, id: &str, new_name: &str) -> PersistResult<bool> {
        let mut all = self.read_all()?;
        let Some(formation) = all.iter_mut().find(|f| f.id == id) else {
            return Ok(false);
        };
        formation.rename(new_name, now_millis());
        self.write_all(&all)?;
        Ok(true)
    }
}
