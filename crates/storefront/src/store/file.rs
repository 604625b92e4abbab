//! File-backed storage: one JSON file per key inside a data directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{StorageBackend, StorageError};

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a sibling `.tmp` file first and are renamed into place, so a
/// reader never sees a half-written blob. Two processes writing the same key
/// race last-writer-wins.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` as the data directory. It is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn io_error(key: &str, source: std::io::Error) -> StorageError {
        StorageError::Io {
            key: key.to_owned(),
            source,
        }
    }
}

impl StorageBackend for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(key, e))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, blob).map_err(|e| Self::io_error(key, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| {
            std::fs::remove_file(&tmp).ok();
            Self::io_error(key, e)
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_missing_key_loads_none() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("data"));
        assert!(storage.load("fruittura-cart").unwrap().is_none());
    }

    #[test]
    fn test_save_creates_dir_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        let storage = FileStorage::new(&data);

        storage.save("fruittura-cart", r#"{"state":{"items":[]},"version":0}"#).unwrap();

        assert!(data.join("fruittura-cart.json").exists());
        assert!(!data.join("fruittura-cart.json.tmp").exists());
        assert_eq!(
            storage.load("fruittura-cart").unwrap().as_deref(),
            Some(r#"{"state":{"items":[]},"version":0}"#)
        );
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.save("fruittura-auth", "{}").unwrap();

        storage.remove("fruittura-auth").unwrap();
        storage.remove("fruittura-auth").unwrap();
        assert!(storage.load("fruittura-auth").unwrap().is_none());
    }

    #[test]
    fn test_failed_rename_cleans_up_temp_file() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        // A non-empty directory at the target path makes the rename fail.
        let target = dir.path().join("fruittura-cart.json");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("occupied"), "").unwrap();

        let err = storage.save("fruittura-cart", "{}").unwrap_err();

        assert!(matches!(err, StorageError::Io { ref key, .. } if key == "fruittura-cart"));
        assert!(!dir.path().join("fruittura-cart.json.tmp").exists());
    }
}
