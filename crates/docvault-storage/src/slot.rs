//! Durable key-value slots holding the encoded snapshot.
//!
//! The service writes exactly one key, [`SNAPSHOT_KEY`]. A `set` replaces the
//! whole value; implementations must make that replacement atomic so a failed
//! or interrupted write leaves the previous value readable.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tempfile::NamedTempFile;

use crate::error::StorageError;

/// The single key the snapshot is stored under.
pub const SNAPSHOT_KEY: &str = "sqliteDb";

/// A string-valued key-value store.
pub trait KeyValueStore {
    /// Returns the value for `key`, or `None` if it was never set.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value for `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

// ---------------------------------------------------------------------------
// In-memory slot
// ---------------------------------------------------------------------------

/// Process-local key-value store.
///
/// Clones share the same map, so a second service built from a clone sees
/// what the first one flushed. An optional quota caps the total size of all
/// stored values, like browser local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValue {
    entries: Arc<Mutex<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryKeyValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes once the stored values exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        MemoryKeyValue {
            entries: Arc::default(),
            quota: Some(bytes),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock cannot leave a half-written value:
        // every write is a single insert.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryKeyValue {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.lock();
        if let Some(quota) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File-backed slot
// ---------------------------------------------------------------------------

/// One file per key inside a directory.
///
/// Writes go to a temp file in the same directory which is then renamed over
/// the target, so readers see either the old value or the new one.
#[derive(Debug, Clone)]
pub struct FileKeyValue {
    dir: PathBuf,
}

impl FileKeyValue {
    /// Opens (creating if needed) the directory backing the store.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(FileKeyValue { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::Io(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("invalid key '{}'", key),
            )));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileKeyValue {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let target = self.path_for(key)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|err| StorageError::Io(err.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clones_share_entries() {
        let mut a = MemoryKeyValue::new();
        let b = a.clone();
        a.set(SNAPSHOT_KEY, "value").unwrap();
        assert_eq!(b.get(SNAPSHOT_KEY).unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn memory_quota_rejects_and_keeps_old_value() {
        let mut kv = MemoryKeyValue::with_quota(SNAPSHOT_KEY.len() + 4);
        kv.set(SNAPSHOT_KEY, "abcd").unwrap();
        let err = kv.set(SNAPSHOT_KEY, "abcde").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(kv.get(SNAPSHOT_KEY).unwrap().as_deref(), Some("abcd"));
    }

    #[test]
    fn file_store_round_trips_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut kv = FileKeyValue::open(dir.path()).unwrap();
        assert_eq!(kv.get(SNAPSHOT_KEY).unwrap(), None);

        kv.set(SNAPSHOT_KEY, "first").unwrap();
        kv.set(SNAPSHOT_KEY, "second").unwrap();
        assert_eq!(kv.get(SNAPSHOT_KEY).unwrap().as_deref(), Some("second"));

        let reopened = FileKeyValue::open(dir.path()).unwrap();
        assert_eq!(reopened.get(SNAPSHOT_KEY).unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKeyValue::open(dir.path()).unwrap();
        assert!(kv.get("../escape").is_err());
    }

    #[test]
    fn boxed_store_forwards() {
        let mut kv: Box<dyn KeyValueStore + Send> = Box::new(MemoryKeyValue::new());
        kv.set("k", "v").unwrap();
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("v"));
    }
}
