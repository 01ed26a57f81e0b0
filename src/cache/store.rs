use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

/// A persistent key-value store for JSON blobs.
///
/// Entries have no TTL: they live until overwritten or removed. Writes are
/// whole-blob replacements, so concurrent writers race with last-write-wins
/// semantics and no corruption.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed store keeping one `<key>.json` file per entry.
pub struct FileStore {
    cache_dir: PathBuf,
}

impl FileStore {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory {:?}", cache_dir))?;
        Ok(Self { cache_dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }
}

impl CacheStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache entry: {}", key))?;
        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.entry_path(key), value)
            .with_context(|| format!("Failed to write cache entry: {}", key))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove cache entry: {}", key))?;
        }
        Ok(())
    }
}

/// In-memory store for tests and hosts without persistent storage.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes are whole-value replacements, so a poisoned lock leaves no
    /// partially-written entry behind and can be recovered from.
    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}

/// Read and parse a cached value. Any failure (missing entry, read error,
/// parse error) yields `None`; callers fall through to the network path.
pub(crate) fn load_json<T: DeserializeOwned>(store: &dyn CacheStore, key: &str) -> Option<T> {
    let blob = match store.get(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => return None,
        Err(e) => {
            debug!(key, error = %e, "Failed to read cache entry");
            return None;
        }
    };
    match serde_json::from_str(&blob) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(key, error = %e, "Failed to parse cache entry");
            None
        }
    }
}

/// Serialize and persist a value. Failures are logged, never surfaced: the
/// cache is a side-channel and must not break a fetch that already succeeded.
pub(crate) fn store_json<T: Serialize>(store: &dyn CacheStore, key: &str, value: &T) {
    let blob = match serde_json::to_string(value) {
        Ok(blob) => blob,
        Err(e) => {
            debug!(key, error = %e, "Failed to serialize cache entry");
            return;
        }
    };
    if let Err(e) = store.set(key, &blob) {
        debug!(key, error = %e, "Failed to write cache entry");
    }
}
