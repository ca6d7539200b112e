//! Durable key-value backends holding serialized collections.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::StoreError;

/// A string-keyed blob store.
///
/// `set` replaces the whole value; there is no append or partial update.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if it was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// One JSON file per key inside a data directory.
///
/// Writes go to a temporary sibling that is then renamed over the target,
/// so a crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir` as the data directory. It is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage key '{key}'"),
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Process-local store. Clones share the same map, which lets tests
/// reopen a [`crate::LocalStore`] over the same data to simulate a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock cannot leave a half-written String.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn file_store_returns_none_for_unwritten_keys() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = FileStore::new(dir.path().join("data"));
        assert_eq!(store.get("ai_chars").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_overwrites_whole_value() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = FileStore::new(dir.path());

        store.set("ai_chars", "[1,2,3]").await.unwrap();
        store.set("ai_chars", "[]").await.unwrap();

        assert_eq!(store.get("ai_chars").await.unwrap().as_deref(), Some("[]"));
        assert!(!dir.path().join("ai_chars.json.tmp").exists());
    }

    #[tokio::test]
    async fn file_store_creates_missing_data_dir() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let nested = dir.path().join("a").join("b");
        let store = FileStore::new(&nested);

        store.set("ai_scenes", "[]").await.unwrap();
        assert!(nested.join("ai_scenes.json").exists());
    }

    #[tokio::test]
    async fn file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = FileStore::new(dir.path());

        assert_matches!(store.set("../escape", "x").await, Err(StoreError::Io(_)));
        assert_matches!(store.get("").await, Err(StoreError::Io(_)));
    }

    #[tokio::test]
    async fn memory_store_clones_share_entries() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.set("k", "v").await.unwrap();
        assert_eq!(b.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
