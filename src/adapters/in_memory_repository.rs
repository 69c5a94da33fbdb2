//! In-memory policy repository for testing.
//!
//! This adapter provides a pure in-memory implementation of PolicyRepository,
//! enabling fast tests without any file system I/O. Values are still encoded
//! to MessagePack bytes so that tests exercise the same serialization path as
//! the file adapter.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    Result,
    error::Error,
    ports::PolicyRepository,
    q_learning::{Checkpoint, SavedPolicy},
};

/// In-memory repository for testing.
///
/// # Examples
///
/// ```
/// use dungeon_agents::adapters::InMemoryRepository;
/// use dungeon_agents::ports::PolicyRepository;
/// use dungeon_agents::q_learning::{QTable, SavedPolicy};
/// use dungeon_agents::reward::Persona;
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let policy = SavedPolicy::new("QLearning_RUNNER", Persona::Runner, QTable::new());
///
/// repo.save_policy(&policy, Path::new("runner"))?;
/// let loaded = repo.load_policy(Path::new("runner"))?;
/// assert_eq!(loaded, policy);
/// # Ok::<(), dungeon_agents::Error>(())
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of entries currently stored.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Clear all stored entries.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Store raw bytes at a key, bypassing serialization.
    ///
    /// Useful for simulating corrupt data in tests.
    pub fn insert_raw(&self, path: &Path, bytes: Vec<u8>) {
        self.lock().insert(Self::key(path), bytes);
    }

    fn key(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // Entries are inserted whole, so a poisoned map is still consistent.
        self.storage
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn store<T: Serialize>(&self, value: &T, path: &Path, what: &str) -> Result<()> {
        let bytes = rmp_serde::to_vec(value).map_err(|e| Error::SerializationContext {
            operation: format!("serialize {what} for in-memory storage"),
            message: e.to_string(),
        })?;
        self.lock().insert(Self::key(path), bytes);
        Ok(())
    }

    fn fetch<T: DeserializeOwned>(&self, path: &Path, what: &str) -> Result<T> {
        let storage = self.lock();
        let bytes = storage.get(&Self::key(path)).ok_or_else(|| Error::Io {
            operation: format!("load {what} from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: format!("deserialize {what} from in-memory storage"),
            message: e.to_string(),
        })
    }
}

impl PolicyRepository for InMemoryRepository {
    fn save_policy(&self, policy: &SavedPolicy, path: &Path) -> Result<()> {
        self.store(policy, path, "policy")
    }

    fn load_policy(&self, path: &Path) -> Result<SavedPolicy> {
        self.fetch(path, "policy")
    }

    fn save_checkpoint(&self, checkpoint: &Checkpoint, path: &Path) -> Result<()> {
        self.store(checkpoint, path, "checkpoint")
    }

    fn load_checkpoint(&self, path: &Path) -> Result<Checkpoint> {
        self.fetch(path, "checkpoint")
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(&Self::key(path))
    }

    fn remove(&self, path: &Path) -> Result<()> {
        self.lock().remove(&Self::key(path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{q_learning::QTable, reward::Persona};

    #[test]
    fn test_in_memory_save_and_load() {
        let repo = InMemoryRepository::new();
        let checkpoint = Checkpoint::new(Persona::Survivalist, 30_001, QTable::new());
        let path = Path::new("ckpt_SURVIVALIST_map1");

        assert_eq!(repo.count(), 0);
        assert!(!repo.exists(path));

        repo.save_checkpoint(&checkpoint, path).unwrap();
        assert_eq!(repo.count(), 1);
        assert!(repo.exists(path));

        let loaded = repo.load_checkpoint(path).unwrap();
        assert_eq!(loaded, checkpoint);
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_policy(Path::new("nonexistent")).is_err());
    }

    #[test]
    fn test_corrupt_bytes_return_error() {
        let repo = InMemoryRepository::new();
        repo.insert_raw(Path::new("broken"), vec![0xc1, 0x00, 0xff]);
        assert!(matches!(
            repo.load_policy(Path::new("broken")),
            Err(Error::SerializationContext { .. })
        ));
    }

    #[test]
    fn test_clone_shares_storage() {
        let repo1 = InMemoryRepository::new();
        let repo2 = repo1.clone();
        let policy = SavedPolicy::new("shared", Persona::Baseline, QTable::new());

        repo1.save_policy(&policy, Path::new("shared")).unwrap();
        assert_eq!(repo2.load_policy(Path::new("shared")).unwrap(), policy);

        repo2.clear();
        assert_eq!(repo1.count(), 0);
    }
}
