//! Key-value persistence contract
//!
//! Mirrors the browser-style `getItem` / `setItem` / `removeItem` surface the
//! token store needs, so the persistence backend can be injected instead of
//! living in process-wide state.

use async_trait::async_trait;

use super::error::StorageResult;

/// Trait for string key-value persistence
///
/// Implementations must treat a missing key as `Ok(None)` on read and as a
/// successful no-op on removal.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    ///
    /// # Errors
    /// Returns error if the backend cannot be read
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    /// Returns error if the backend cannot be written
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key` (idempotent)
    ///
    /// # Errors
    /// Returns error if the backend cannot be written
    async fn remove(&self, key: &str) -> StorageResult<()>;
}
