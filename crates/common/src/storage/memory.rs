//! In-memory key-value backend
//!
//! Lives for the lifetime of the process. Useful for ephemeral sessions and as
//! the default double in tests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::warn;

use super::error::StorageResult;
use super::traits::KeyValueStore;

type StorageData = Arc<RwLock<HashMap<String, String>>>;

/// Key-value store backed by a shared `HashMap`
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    storage: StorageData,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the store holds no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Synchronous read, handy for assertions
    #[must_use]
    pub fn snapshot(&self, key: &str) -> Option<String> {
        self.read().get(key).cloned()
    }

    /// Synchronous write, handy for seeding fixtures
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.write().insert(key.into(), value.into());
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        match self.storage.read() {
            Ok(guard) => guard,
            Err(poison_err) => {
                warn!("Memory store lock poisoned, recovering");
                poison_err.into_inner()
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        match self.storage.write() {
            Ok(guard) => guard,
            Err(poison_err) => {
                warn!("Memory store lock poisoned, recovering");
                poison_err.into_inner()
            }
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.snapshot(key))
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.insert(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.write().remove(key);
        Ok(())
    }
}
