//! Key/value session storage.
//!
//! Values are strings (JSON for structured data), mirroring a browser's
//! `sessionStorage`. [`FileStorage`] keeps the whole map in one
//! `session.json` and rewrites it atomically on every mutation.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session storage IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode session value: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait SessionStorage: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
    fn clear(&mut self) -> Result<(), StorageError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        Ok(())
    }
}

#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open (or create) the session store in `dir`.
    ///
    /// An unreadable or malformed file is logged and treated as empty.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(dir).map_err(|source| StorageError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(SESSION_FILE);
        rideready_utils::recover_bak_file(&path);

        let entries = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), "Discarding malformed session file: {e}");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), "Failed to read session file: {e}");
                BTreeMap::new()
            }
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened session storage");
        Ok(Self { path, entries })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(&self.entries)?;
        rideready_utils::atomic_write(&self.path, &bytes).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        if self.entries.get(key) == Some(&value) {
            return Ok(());
        }
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::{FileStorage, MemoryStorage, SESSION_FILE, SessionStorage};
    use std::fs;

    #[test]
    fn memory_storage_basic_ops() {
        let mut storage = MemoryStorage::new();
        storage.set("a", "1".to_string()).unwrap();
        assert_eq!(storage.get("a").as_deref(), Some("1"));
        storage.set("a", "2".to_string()).unwrap();
        assert_eq!(storage.get("a").as_deref(), Some("2"));
        storage.clear().unwrap();
        assert!(storage.get("a").is_none());
    }

    #[test]
    fn file_storage_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut storage = FileStorage::open(dir.path()).unwrap();
            storage.set("rr.boot_id", "boot-1".to_string()).unwrap();
        }
        let storage = FileStorage::open(dir.path()).unwrap();
        assert_eq!(storage.get("rr.boot_id").as_deref(), Some("boot-1"));
    }

    #[test]
    fn file_storage_clear_empties_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set("k", "v".to_string()).unwrap();
        storage.clear().unwrap();

        let reopened = FileStorage::open(dir.path()).unwrap();
        assert!(reopened.get("k").is_none());
        assert_eq!(fs::read_to_string(dir.path().join(SESSION_FILE)).unwrap().trim(), "{}");
    }

    #[test]
    fn malformed_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SESSION_FILE), b"{ not json").unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert!(storage.get("anything").is_none());
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let mut storage = FileStorage::open(&nested).unwrap();
        storage.set("k", "v".to_string()).unwrap();
        assert!(nested.join(SESSION_FILE).exists());
    }
}
