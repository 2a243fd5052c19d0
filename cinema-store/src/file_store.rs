use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cinema_core::repository::{KeyValueStore, StoreError};
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Durable store backed by a single JSON object on disk.
///
/// The whole map is loaded on open and rewritten (via a temp file and
/// rename) on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Store file {} is unreadable, starting empty: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(StoreError::Io(e)),
        };

        info!("Opened file store {} ({} keys)", path.display(), entries.len());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, raw).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value);

        // Memory only follows disk
        self.flush(&updated).await?;
        *entries = updated;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        let Some(previous) = entries.remove(key) else {
            return Ok(());
        };

        if let Err(e) = self.flush(&entries).await {
            entries.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = FileStore::open(&path).await.unwrap();
        store.set("userTickets", "[]".to_string()).await.unwrap();
        store.set("theme", "dark".to_string()).await.unwrap();
        store.remove("theme").await.unwrap();
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(reopened.get("userTickets").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get("theme").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_flush_leaves_entries_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        let store = FileStore::open(data.join("storage.json")).await.unwrap();
        store.set("currentUser", "\"jane@example.com\"".to_string()).await.unwrap();

        // A plain file where the data directory should be
        tokio::fs::remove_dir_all(&data).await.unwrap();
        tokio::fs::write(&data, "not a directory").await.unwrap();

        assert!(store.set("userTickets", "[1]".to_string()).await.is_err());
        assert_eq!(store.get("userTickets").await.unwrap(), None);

        assert!(store.remove("currentUser").await.is_err());
        assert_eq!(
            store.get("currentUser").await.unwrap().as_deref(),
            Some("\"jane@example.com\"")
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get("anything").await.unwrap(), None);
    }
}
