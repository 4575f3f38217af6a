//! JSON-file key-value backend
//!
//! All keys live in one JSON object on disk. Writes go to a temporary file in
//! the same directory which is then renamed over the original, so a crash
//! never leaves a half-written file behind.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use songlink_common::storage::{KeyValueStore, StorageError, StorageResult};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, warn};

type Entries = BTreeMap<String, String>;

/// Key-value store persisted as a JSON object file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Store backed by `path`; nothing is created until the first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    /// Backing file location
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> StorageResult<Entries> {
        let path = self.path.clone();
        run_blocking(move || read_entries(&path)).await
    }

    async fn update<F>(&self, mutate: F) -> StorageResult<()>
    where
        F: FnOnce(&mut Entries) -> bool + Send + 'static,
    {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        run_blocking(move || {
            let mut entries = read_entries(&path)?;
            if mutate(&mut entries) {
                write_entries(&path, &entries)?;
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        debug!(key = %key, path = %self.path.display(), "Writing key to file store");
        let (key, value) = (key.to_string(), value.to_string());
        self.update(move |entries| {
            entries.insert(key, value);
            true
        })
        .await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        debug!(key = %key, path = %self.path.display(), "Removing key from file store");
        let key = key.to_string();
        self.update(move |entries| entries.remove(&key).is_some()).await
    }
}

async fn run_blocking<T, F>(work: F) -> StorageResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> StorageResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| StorageError::Backend(format!("file store task failed: {e}")))?
}

fn read_entries(path: &Path) -> StorageResult<Entries> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
        Err(e) => return Err(e.into()),
    };

    if contents.trim().is_empty() {
        return Ok(Entries::new());
    }

    match serde_json::from_str(&contents) {
        Ok(entries) => Ok(entries),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Storage file is not a JSON object of strings; treating as empty");
            Ok(Entries::new())
        }
    }
}

fn write_entries(path: &Path, entries: &Entries) -> StorageResult<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, entries)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StorageError::Io(e.error))?;
    Ok(())
}
