//! Filesystem storage backend rooted at a directory.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{PersistError, PersistResult, StorageBackend};

/// Maps keys to files below `root`.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Opens `root`, creating it if needed.
    pub fn open(root: impl AsRef<Path>) -> PersistResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Directory every key is resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PersistResult<PathBuf> {
        let mut path = self.root.clone();
        for part in key.split('/').filter(|p| !p.is_empty()) {
            if part == "." || part == ".." {
                return Err(PersistError::Message(format!("invalid storage key: {key}")));
            }
            path.push(part);
        }
        Ok(path)
    }
}

impl StorageBackend for FsStorage {
    fn exists(&self, key: &str) -> PersistResult<bool> {
        Ok(self.path_for(key)?.exists())
    }

    fn read(&self, key: &str) -> PersistResult<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)?) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> PersistResult<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write-then-rename so a crash never leaves a half-written record.
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &path)?;

        log::debug!("wrote {} bytes to {:?}", bytes.len(), path);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> PersistResult<()> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn make_directory(&mut self, path: &str) -> PersistResult<()> {
        fs::create_dir_all(self.path_for(path)?)?;
        Ok(())
    }
}
