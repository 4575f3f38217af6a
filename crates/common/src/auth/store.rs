//! Token store layered on top of a [`KeyValueStore`].
//!
//! Owns the single persisted token record under a namespace-prefixed key.
//! No validation happens here; [`codec`](super::codec) decides whether the
//! raw string is usable.

use std::sync::Arc;

use tracing::debug;

use super::codec;
use super::types::TokenRecord;
use crate::storage::{KeyValueStore, StorageResult};

/// Namespace shared by every key the plugin persists
pub const DEFAULT_NAMESPACE: &str = "obsidian-song-links";

/// Storage key for the token record under `namespace`
#[must_use]
pub fn token_key(namespace: &str) -> String {
    format!("{namespace}-token")
}

/// Persistence wrapper for the one token record
pub struct TokenStore<S: KeyValueStore + ?Sized> {
    backend: Arc<S>,
    key: String,
}

impl<S: KeyValueStore + ?Sized> TokenStore<S> {
    /// Create a store keyed under `namespace`
    pub fn new(backend: Arc<S>, namespace: &str) -> Self {
        Self { backend, key: token_key(namespace) }
    }

    /// Storage key in use
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying key-value backend
    #[must_use]
    pub fn backend(&self) -> &Arc<S> {
        &self.backend
    }

    /// Persist `record`, replacing any previous one, and hand it back
    ///
    /// # Errors
    /// Returns error if the backend write fails
    pub async fn save(&self, record: TokenRecord) -> StorageResult<TokenRecord> {
        debug!(key = %self.key, expires_at = record.expires_at, "Storing token record");
        self.backend.set(&self.key, &codec::encode(&record)).await?;
        Ok(record)
    }

    /// Remove the record (idempotent)
    ///
    /// # Errors
    /// Returns error if the backend write fails
    pub async fn clear(&self) -> StorageResult<()> {
        debug!(key = %self.key, "Clearing token record");
        self.backend.remove(&self.key).await
    }

    /// Raw persisted form, `None` when nothing is stored
    ///
    /// # Errors
    /// Returns error if the backend read fails
    pub async fn read(&self) -> StorageResult<Option<String>> {
        self.backend.get(&self.key).await
    }
}
