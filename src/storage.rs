use crate::types::{Result, ScanError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::debug;

/// Durable string key-value storage. Implementations are shared across
/// tasks, so both operations take `&self`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Volatile store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a single JSON object file on disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Places the store under the platform data directory.
    pub fn in_data_dir() -> Result<Self> {
        let base = dirs::data_dir().ok_or_else(|| {
            ScanError::Storage("could not determine the platform data directory".to_string())
        })?;
        Ok(Self::at_path(base.join("tuberscan").join("storage.json")))
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_entries(&self) -> Result<HashMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_entries(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let serialized = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, serialized).await?;
        debug!("Wrote {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trips() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = FileStore::at_path(&path);
        store.set("bookmarks", "[\"late-blight\"]").await.unwrap();

        let reopened = FileStore::at_path(&path);
        assert_eq!(
            reopened.get("bookmarks").await.unwrap(),
            Some("[\"late-blight\"]".to_string())
        );
    }

    #[tokio::test]
    async fn file_store_treats_a_missing_file_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::at_path(dir.path().join("nope.json"));
        assert_eq!(store.get("bookmarks").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_reports_corrupt_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let store = FileStore::at_path(&path);
        assert!(store.get("bookmarks").await.is_err());
    }
}
