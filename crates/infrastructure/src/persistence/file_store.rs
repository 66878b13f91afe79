//! On-disk key-value store.
//!
//! Keeps every key in one JSON object file in the platform-specific config
//! directory:
//! - Linux: ~/.config/jimeng/storage.json
//! - macOS: ~/Library/Application Support/jimeng/storage.json
//! - Windows: %APPDATA%/jimeng/storage.json

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use jimeng_application::ports::{KeyValueStore, StorageError};
use tracing::{debug, warn};

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Key-value store backed by a single JSON file.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Creates a store at an explicit path. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Creates a store at the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined.
    pub fn open_default() -> Result<Self, StorageError> {
        Self::default_path().map(Self::new).ok_or_else(|| {
            StorageError::Unavailable("could not determine config directory".to_string())
        })
    }

    /// Returns the default store path, if the platform has a config directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("jimeng").join("storage.json"))
    }

    /// Returns the file this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read(&self.path)?;
        from_json_bytes(&content).map_err(|e| StorageError::Corrupt(e.to_string()))
    }

    /// Reads the map for modification. A corrupt file is replaced.
    fn read_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_all() {
            Err(StorageError::Corrupt(reason)) => {
                warn!(path = %self.path.display(), %reason, "replacing corrupt store file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content =
            to_json_stable_bytes(entries).map_err(|e| StorageError::Corrupt(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), keys = entries.len(), "store written");
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.guard();
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.guard();
        let mut entries = self.read_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.guard();
        let mut entries = self.read_for_write()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileKeyValueStore {
        FileKeyValueStore::new(dir.path().join("nested").join("storage.json"))
    }

    #[test]
    fn default_path_is_under_jimeng() {
        if let Some(p) = FileKeyValueStore::default_path() {
            assert!(p.ends_with("jimeng/storage.json"));
        }
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.get("anything").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        store_in(&dir).set("jimeng_region", "International").unwrap();
        store_in(&dir).set("jimeng_config", r#"{"CN":{}}"#).unwrap();

        let reopened = store_in(&dir);
        assert_eq!(reopened.get("jimeng_region").unwrap().as_deref(), Some("International"));
        assert_eq!(reopened.get("jimeng_config").unwrap().as_deref(), Some(r#"{"CN":{}}"#));
    }

    #[test]
    fn file_is_stable_json() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set("b", "2").unwrap();
        store.set("a", "1").unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "{\n  \"a\": \"1\",\n  \"b\": \"2\"\n}\n");
    }

    #[test]
    fn remove_deletes_only_that_key() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.remove("a").unwrap();
        store.remove("missing").unwrap();

        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn corrupt_file_errors_on_read_and_is_replaced_on_write() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json").unwrap();

        assert!(matches!(store.get("a"), Err(StorageError::Corrupt(_))));
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }
}
