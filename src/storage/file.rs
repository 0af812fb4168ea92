//! File-backed store
//!
//! All entries live in one JSON object on disk. Every write rewrites the
//! whole document through a sibling temporary file and a rename, so a reader
//! never sees a half-written file.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::RwLock,
};

use tracing::{debug, warn};

use crate::storage::{KeyValueStore, StorageError};

/// JSON-file store
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file starts an empty store; a file that is not a JSON object
    /// of strings is treated the same way and will be replaced on first write.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError::Io`] if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|error| {
                warn!(path = %path.display(), %error, "ignoring unreadable store file");
                BTreeMap::new()
            }),
            Err(error) if error.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => return Err(error.into()),
        };

        debug!(path = %path.display(), entries = entries.len(), "store opened");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let document = serde_json::to_string_pretty(entries)?;
        let staging = self.path.with_extension("tmp");

        fs::write(&staging, document)?;
        fs::rename(&staging, &self.path)?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_err| StorageError::Poisoned)?;

        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_err| StorageError::Poisoned)?;

        entries.insert(key.to_string(), value.to_string());

        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_err| StorageError::Poisoned)?;

        if entries.remove(key).is_none() {
            return Ok(());
        }

        self.flush(&entries)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_file_opens_empty() -> TestResult {
        let dir = tempdir()?;
        let store = FileStore::open(dir.path().join("store.json"))?;

        assert_eq!(store.get("kopiprima_cart")?, None);

        Ok(())
    }

    #[test]
    fn values_survive_reopen() -> TestResult {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("store.json");

        FileStore::open(&path)?.set("isLoggedIn", "true")?;

        let reopened = FileStore::open(&path)?;

        assert_eq!(reopened.get("isLoggedIn")?.as_deref(), Some("true"));

        Ok(())
    }

    #[test]
    fn corrupt_file_opens_empty() -> TestResult {
        let dir = tempdir()?;
        let path = dir.path().join("store.json");
        fs::write(&path, "not json")?;

        let store = FileStore::open(&path)?;

        assert_eq!(store.get("anything")?, None);

        Ok(())
    }

    #[test]
    fn remove_persists() -> TestResult {
        let dir = tempdir()?;
        let path = dir.path().join("store.json");

        let store = FileStore::open(&path)?;
        store.set("a", "1")?;
        store.remove("a")?;

        assert_eq!(FileStore::open(&path)?.get("a")?, None);

        Ok(())
    }
}
