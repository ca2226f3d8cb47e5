use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::{AdmobError, AdmobResult};

use super::entry::ConfigEntry;

#[derive(Debug, Default, Serialize, Deserialize)]
struct EntriesFile {
    #[serde(default)]
    entries: Vec<ConfigEntry>,
}

/// Config entries persisted as a single TOML file.
///
/// Every mutation rewrites the whole file. Mutations are serialised through an
/// internal lock so concurrent `add` calls cannot lose each other's writes.
pub struct ConfigEntryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ConfigEntryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &AppConfig) -> AdmobResult<Self> {
        let path = config.entries_path().ok_or_else(|| {
            AdmobError::ConfigFileNotFound("Could not determine config directory".to_string())
        })?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> AdmobResult<Vec<ConfigEntry>> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        let file: EntriesFile = toml::from_str(&content)?;
        Ok(file.entries)
    }

    async fn save(&self, entries: Vec<ConfigEntry>) -> AdmobResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = toml::to_string_pretty(&EntriesFile { entries })?;
        tokio::fs::write(&self.path, content).await?;
        debug!("Saved config entries to {}", self.path.display());
        Ok(())
    }

    pub async fn list(&self) -> AdmobResult<Vec<ConfigEntry>> {
        self.load().await
    }

    pub async fn get(&self, entry_id: &str) -> AdmobResult<ConfigEntry> {
        self.load()
            .await?
            .into_iter()
            .find(|e| e.entry_id == entry_id)
            .ok_or_else(|| AdmobError::EntryNotFound(entry_id.to_string()))
    }

    pub async fn find_by_publisher(&self, publisher_id: &str) -> AdmobResult<Option<ConfigEntry>> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .find(|e| e.publisher_id() == publisher_id))
    }

    /// Persist a new entry. A publisher can only be configured once.
    pub async fn add(&self, entry: ConfigEntry) -> AdmobResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;

        if entries.iter().any(|e| e.publisher_id() == entry.publisher_id()) {
            return Err(AdmobError::AlreadyConfigured(
                entry.publisher_id().to_string(),
            ));
        }

        info!("Adding config entry {} ({})", entry.entry_id, entry.title);
        entries.push(entry);
        self.save(entries).await
    }

    pub async fn remove(&self, entry_id: &str) -> AdmobResult<ConfigEntry> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;

        let index = entries
            .iter()
            .position(|e| e.entry_id == entry_id)
            .ok_or_else(|| AdmobError::EntryNotFound(entry_id.to_string()))?;

        let removed = entries.remove(index);
        self.save(entries).await?;

        info!("Removed config entry {} ({})", removed.entry_id, removed.title);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Credentials;
    use tempfile::TempDir;

    fn entry(publisher_id: &str) -> ConfigEntry {
        ConfigEntry::new(Credentials::new("id", "secret", "1//token", publisher_id))
    }

    #[tokio::test]
    async fn test_missing_file_lists_empty() {
        let dir = TempDir::new().unwrap();
        let store = ConfigEntryStore::new(dir.path().join("entries.toml"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_get_remove() {
        let dir = TempDir::new().unwrap();
        let store = ConfigEntryStore::new(dir.path().join("nested").join("entries.toml"));

        let first = entry("pub-1");
        let second = entry("pub-2");
        store.add(first.clone()).await.unwrap();
        store.add(second.clone()).await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 2);
        assert_eq!(store.get(&first.entry_id).await.unwrap(), first);
        assert_eq!(
            store.find_by_publisher("pub-2").await.unwrap().unwrap().entry_id,
            second.entry_id
        );

        let removed = store.remove(&first.entry_id).await.unwrap();
        assert_eq!(removed.entry_id, first.entry_id);
        assert!(matches!(
            store.get(&first.entry_id).await,
            Err(AdmobError::EntryNotFound(_))
        ));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_publisher_rejected() {
        let dir = TempDir::new().unwrap();
        let store = ConfigEntryStore::new(dir.path().join("entries.toml"));

        store.add(entry("pub-1")).await.unwrap();
        let err = store.add(entry("pub-1")).await.unwrap_err();

        assert_eq!(err.error_code(), "E7002");
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_unknown_entry() {
        let dir = TempDir::new().unwrap();
        let store = ConfigEntryStore::new(dir.path().join("entries.toml"));
        assert!(store.remove("nope").await.is_err());
    }

    #[tokio::test]
    async fn test_file_is_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("entries.toml");
        let store = ConfigEntryStore::new(&path);

        store.add(entry("pub-7")).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[[entries]]"));
        assert!(content.contains("publisher_id = \"pub-7\""));
        assert!(content.contains("title = \"AdMob (pub-7)\""));
    }
}
