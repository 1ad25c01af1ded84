//! Directory-of-files formation store with a separate ordered id index.
//!
//! Layout below the storage root:
//! ```text
//! formations/index.json   ["<newest id>", ..., "<oldest id>"]
//! formations/<id>.json    one SavedFormation each
//! ```

use crate::{
    formation::{FormationDraft, SavedFormation, now_millis},
    types::FormationId,
};

use super::{FormationStore, PersistError, PersistResult, StorageBackend, is_valid_id};

const FORMATIONS_DIR: &str = "formations";
const INDEX_FILE: &str = "index.json";

/// [`FormationStore`] keeping one record per formation.
///
/// Index entries whose record is missing or unreadable are skipped when
/// listing, never repaired behind the caller's back. Writes refuse to run
/// against an index they cannot read.
pub struct DirectoryFormationStore<S> {
    storage: S,
}

impl<S: StorageBackend> DirectoryFormationStore<S> {
    /// Store rooted at the top of `storage`.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Underlying backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Ids in listing order, as recorded in the index.
    pub fn index(&self) -> Vec<FormationId> {
        self.read_index()
    }

    fn index_key() -> String {
        format!("{FORMATIONS_DIR}/{INDEX_FILE}")
    }

    fn record_key(id: &str) -> String {
        format!("{FORMATIONS_DIR}/{id}.json")
    }

    fn ensure_dir(&mut self) -> PersistResult<()> {
        if !self.storage.exists(FORMATIONS_DIR)? {
            self.storage.make_directory(FORMATIONS_DIR)?;
        }
        Ok(())
    }

    /// Lenient read for listing: any failure lists as empty.
    fn read_index(&self) -> Vec<FormationId> {
        self.load_index().unwrap_or_else(|err| {
            log::warn!("formation index unreadable, listing as empty: {err}");
            Vec::new()
        })
    }

    /// Strict read for the write paths: backend errors propagate and an
    /// unparseable index is [`PersistError::Corrupt`].
    fn load_index(&self) -> PersistResult<Vec<FormationId>> {
        let key = Self::index_key();
        let Some(bytes) = self.storage.read(&key)? else {
            return Ok(Vec::new());
        };
        serde_json::from_slice(&bytes).map_err(|err| {
            log::warn!("formation index is corrupt: {err}");
            PersistError::Corrupt { key }
        })
    }

    fn write_index(&mut self, ids: &[FormationId]) -> PersistResult<()> {
        let bytes = serde_json::to_vec(ids)?;
        self.storage.write(&Self::index_key(), &bytes)
    }

    fn write_record(&mut self, formation: &SavedFormation) -> PersistResult<()> {
        let bytes = serde_json::to_vec(formation)?;
        self.storage.write(&Self::record_key(&formation.id), &bytes)
    }
}

impl<S: StorageBackend> FormationStore for DirectoryFormationStore<S> {
    fn save(&mut self, draft: FormationDraft) -> PersistResult<SavedFormation> {
        self.ensure_dir()?;

        let formation = SavedFormation::create(draft, now_millis());
        if !is_valid_id(&formation.id) {
            return Err(PersistError::Message(format!("generated invalid id {}", formation.id)));
        }
        let mut index = self.load_index()?;
        self.write_record(&formation)?;

        index.retain(|id| id != &formation.id);
        index.insert(0, formation.id.clone());
        if let Err(err) = self.write_index(&index) {
            // The index is the source of truth for listing; drop the orphan.
            if let Err(cleanup) = self.storage.delete(&Self::record_key(&formation.id)) {
                log::warn!("removing orphan record {} failed: {cleanup}", formation.id);
            }
            return Err(err);
        }

        log::info!("saved formation {} ({:?})", formation.id, formation.name);
        Ok(formation)
    }

    fn load(&self, id: &str) -> Option<SavedFormation> {
        if !is_valid_id(id) {
            return None;
        }
        let key = Self::record_key(id);
        let bytes = match self.storage.read(&key) {
            Ok(bytes) => bytes?,
            Err(err) => {
                log::warn!("reading formation {id} failed: {err}");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(formation) => Some(formation),
            Err(err) => {
                log::warn!("formation {id} is corrupt, skipping: {err}");
                None
            }
        }
    }

    fn list(&self) -> Vec<SavedFormation> {
        self.read_index()
            .iter()
            .filter_map(|id| self.load(id))
            .collect()
    }

    fn remove(&mut self, id: &str) -> PersistResult<bool> {
        if !is_valid_id(id) {
            return Ok(false);
        }

        let mut index = self.load_index()?;
        let key = Self::record_key(id);
        let existed = self.storage.exists(&key)?;
        if existed {
            self.storage.delete(&key)?;
        }

        let before = index.len();
        index.retain(|i| i != id);
        let indexed = index.len() != before;
        if indexed {
            self.write_index(&index)?;
        }

        if existed || indexed {
            log::info!("removed formation {id}");
        }
        Ok(existed || indexed)
    }

    fn rename(&mut self, id: &str, new_name: &str) -> PersistResult<bool> {
        let Some(mut formation) = self.load(id) else {
            return Ok(false);
        };
        formation.rename(new_name, now_millis());
        self.write_record(&formation)?;
        Ok(true)
    }
}
