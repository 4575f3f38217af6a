//! Key-value storage backends
//!
//! [`build_store`] turns the storage settings into the backend every
//! persisted key goes through.

mod file_store;
mod keychain_store;

use std::path::PathBuf;
use std::sync::Arc;

pub use file_store::FileStore;
pub use keychain_store::KeychainStore;
use songlink_common::storage::{KeyValueStore, MemoryStore};
use songlink_domain::{Result, SongLinkError, StorageBackend, StorageSettings};
use tracing::info;

/// Application directory under the platform data dir
const APP_DIR: &str = "songlink";
const STORAGE_FILE: &str = "storage.json";

/// Default file backend location: `<data dir>/songlink/storage.json`
///
/// # Errors
/// Returns `Config` if the platform has no data directory
pub fn default_storage_path() -> Result<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR).join(STORAGE_FILE)).ok_or_else(|| {
        SongLinkError::Config(
            "no platform data directory; set storage.path or SONGLINK_STORAGE_PATH".into(),
        )
    })
}

/// Build the configured key-value backend
///
/// # Errors
/// Returns `Config` if the file backend has no usable location
pub fn build_store(settings: &StorageSettings) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match settings.backend {
        StorageBackend::File => {
            let path = match &settings.path {
                Some(path) => path.clone(),
                None => default_storage_path()?,
            };
            info!(backend = "file", path = %path.display(), "Storage backend selected");
            Arc::new(FileStore::new(path))
        }
        StorageBackend::Keychain => {
            info!(backend = "keychain", service = %settings.keychain_service, "Storage backend selected");
            Arc::new(KeychainStore::new(settings.keychain_service.clone()))
        }
        StorageBackend::Memory => {
            info!(backend = "memory", "Storage backend selected");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn file_backend_uses_configured_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let settings = StorageSettings { path: Some(path.clone()), ..StorageSettings::default() };

        let store = build_store(&settings).unwrap();
        store.set("k", "v").await.unwrap();

        assert!(path.exists());
    }

    #[tokio::test]
    async fn memory_backend_round_trips() {
        let settings =
            StorageSettings { backend: StorageBackend::Memory, ..StorageSettings::default() };

        let store = build_store(&settings).unwrap();
        store.set("k", "v").await.unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
