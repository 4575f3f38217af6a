//! Platform keychain key-value backend
//!
//! Each key becomes one credential (service = configured service name,
//! account = key) in macOS Keychain, Windows Credential Manager, or the
//! Secret Service on Linux.

use async_trait::async_trait;
use keyring::Entry;
use songlink_common::storage::{KeyValueStore, StorageError, StorageResult};
use songlink_domain::SongLinkError;
use tracing::debug;

use crate::errors::InfraError;

/// Key-value store over the platform credential store
#[derive(Debug, Clone)]
pub struct KeychainStore {
    service_name: String,
}

impl KeychainStore {
    /// Store whose entries are filed under `service_name`
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into() }
    }

    /// Service name used for every entry
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    async fn with_entry<T, F>(&self, key: &str, op: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(Entry) -> StorageResult<T> + Send + 'static,
    {
        let service = self.service_name.clone();
        let account = key.to_string();
        tokio::task::spawn_blocking(move || {
            let entry = Entry::new(&service, &account)
                .map_err(|e| keychain_error("Failed to create keychain entry", e))?;
            op(entry)
        })
        .await
        .map_err(|e| StorageError::Backend(format!("keychain task failed: {e}")))?
    }
}

#[async_trait]
impl KeyValueStore for KeychainStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        debug!(service = %self.service_name, key = %key, "Retrieving secret from keychain");
        self.with_entry(key, |entry| match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(keychain_error("Failed to retrieve secret", e)),
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        debug!(service = %self.service_name, key = %key, "Storing secret in keychain");
        let value = value.to_string();
        self.with_entry(key, move |entry| {
            entry.set_password(&value).map_err(|e| keychain_error("Failed to store secret", e))
        })
        .await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        debug!(service = %self.service_name, key = %key, "Deleting secret from keychain");
        self.with_entry(key, |entry| match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(keychain_error("Failed to delete secret", e)),
        })
        .await
    }
}

fn keychain_error(context: &str, err: keyring::Error) -> StorageError {
    let mapped = SongLinkError::from(InfraError::from(err));
    StorageError::Keychain(format!("{context}: {mapped}"))
}

#[cfg(test)]
mod tests {
    //! Unit tests for storage::keychain_store.
    use super::*;

    fn mock_store() -> KeychainStore {
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
        KeychainStore::new("SongLinkTest")
    }

    #[tokio::test]
    async fn missing_entry_reads_as_none() {
        let store = mock_store();
        assert_eq!(store.get("obsidian-song-links-token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn removing_missing_entry_succeeds() {
        let store = mock_store();
        store.remove("obsidian-song-links-token").await.unwrap();
    }

    #[test]
    fn keyring_errors_keep_context() {
        let err = keychain_error("Failed to store secret", keyring::Error::TooLong("account".into(), 10));

        assert!(matches!(err, StorageError::Keychain(msg)
            if msg.starts_with("Failed to store secret: Configuration error")));
    }

    #[tokio::test]
    async fn set_succeeds() {
        let store = mock_store();
        store.set("obsidian-song-links-token", "{}").await.unwrap();
        assert_eq!(store.service_name(), "SongLinkTest");
    }
}
