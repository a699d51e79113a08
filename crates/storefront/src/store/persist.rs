//! Durable key-value persistence for store snapshots.
//!
//! Each store persists one named entry. On disk the entry is an envelope of
//! `{ "state": <persisted fields>, "version": n }`; a version mismatch is
//! treated as an absent entry rather than an error, so old snapshots are
//! discarded instead of crashing hydration.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be serialized or deserialized.
    #[error("storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Abstraction over the durable key-value storage backing the stores.
///
/// Implementations must be cheap to call from synchronous store mutations;
/// snapshots are small JSON documents.
pub trait StateStorage: Send + Sync {
    /// Load the raw envelope stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry exists but cannot be read or parsed.
    fn load(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Save the raw envelope under `key`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be written.
    fn save(&self, key: &str, envelope: &Value) -> Result<(), StorageError>;

    /// Remove the entry under `key`. Removing a missing entry is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal itself fails.
    fn clear(&self, key: &str) -> Result<(), StorageError>;
}

/// The `{ state, version }` envelope wrapped around every persisted snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    state: Value,
    version: u32,
}

/// Load a typed snapshot from storage.
///
/// Returns `None` when the entry is absent or was written by a different
/// snapshot version.
///
/// # Errors
///
/// Returns an error if the entry exists but cannot be read or decoded.
pub fn load_state<T: DeserializeOwned>(
    storage: &dyn StateStorage,
    key: &str,
    version: u32,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = storage.load(key)? else {
        return Ok(None);
    };

    let envelope: Envelope = serde_json::from_value(raw)?;
    if envelope.version != version {
        tracing::warn!(
            key,
            stored = envelope.version,
            expected = version,
            "discarding persisted state with mismatched version"
        );
        return Ok(None);
    }

    Ok(Some(serde_json::from_value(envelope.state)?))
}

/// Save a typed snapshot to storage, wrapped in the version envelope.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_state<T: Serialize>(
    storage: &dyn StateStorage,
    key: &str,
    version: u32,
    state: &T,
) -> Result<(), StorageError> {
    let envelope = Envelope {
        state: serde_json::to_value(state)?,
        version,
    };
    storage.save(key, &serde_json::to_value(&envelope)?)
}

// =============================================================================
// FileStorage
// =============================================================================

/// Filesystem-backed storage: one JSON file per key under a data directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write never leaves a truncated snapshot.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`. The directory is created lazily on
    /// first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let path = self.path_for(key);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn save(&self, key: &str, envelope: &Value) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));

        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(serde_json::to_string(envelope)?.as_bytes())?;
        file.sync_all()?;
        std::fs::rename(&tmp, &path)?;

        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl AsRef<Path> for FileStorage {
    fn as_ref(&self) -> &Path {
        &self.dir
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-memory storage fake for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStorage {
    /// Create an empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let entries = self.entries.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, envelope: &Value) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(key.to_string(), envelope.clone());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Snapshot {
        count: u32,
    }

    #[test]
    fn test_memory_roundtrip() {
        let storage = MemoryStorage::new();
        save_state(&storage, "test", 1, &Snapshot { count: 7 }).unwrap();

        let loaded: Option<Snapshot> = load_state(&storage, "test", 1).unwrap();
        assert_eq!(loaded, Some(Snapshot { count: 7 }));
    }

    #[test]
    fn test_version_mismatch_discards() {
        let storage = MemoryStorage::new();
        save_state(&storage, "test", 1, &Snapshot { count: 7 }).unwrap();

        let loaded: Option<Snapshot> = load_state(&storage, "test", 2).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_missing_key_is_none() {
        let storage = MemoryStorage::new();
        let loaded: Option<Snapshot> = load_state(&storage, "absent", 1).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_clear_removes_entry() {
        let storage = MemoryStorage::new();
        save_state(&storage, "test", 1, &Snapshot { count: 1 }).unwrap();
        storage.clear("test").unwrap();

        let loaded: Option<Snapshot> = load_state(&storage, "test", 1).unwrap();
        assert!(loaded.is_none());

        // Clearing again is a no-op, not an error.
        storage.clear("test").unwrap();
    }

    #[test]
    fn test_envelope_shape_on_disk() {
        let storage = MemoryStorage::new();
        save_state(&storage, "test", 3, &Snapshot { count: 2 }).unwrap();

        let raw = storage.load("test").unwrap().unwrap();
        assert_eq!(raw, json!({ "state": { "count": 2 }, "version": 3 }));
    }

    #[test]
    fn test_file_storage_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        save_state(&storage, "vendora.cart", 1, &Snapshot { count: 9 }).unwrap();
        let loaded: Option<Snapshot> = load_state(&storage, "vendora.cart", 1).unwrap();
        assert_eq!(loaded, Some(Snapshot { count: 9 }));

        storage.clear("vendora.cart").unwrap();
        let loaded: Option<Snapshot> = load_state(&storage, "vendora.cart", 1).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_file_storage_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.load("absent").unwrap().is_none());
        storage.clear("absent").unwrap();
    }
}
