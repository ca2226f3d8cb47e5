use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::api::SourceFactory;
use crate::coordinator::{CoordinatorConfig, UpdateCoordinator};
use crate::error::{AdmobError, AdmobResult};
use crate::setup::ConfigEntry;

use super::entry::EntryRuntime;

type RegistryKey = (String, String);

/// Loaded entries keyed by `(domain, entry_id)`.
pub struct IntegrationRegistry {
    entries: RwLock<HashMap<RegistryKey, Arc<EntryRuntime>>>,
    source_factory: SourceFactory,
    coordinator_config: CoordinatorConfig,
}

impl IntegrationRegistry {
    pub fn new(source_factory: SourceFactory, coordinator_config: CoordinatorConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            source_factory,
            coordinator_config,
        }
    }

    fn key(entry: &ConfigEntry) -> RegistryKey {
        (entry.domain.clone(), entry.entry_id.clone())
    }

    /// Build the client and coordinator for an entry, run the first refresh,
    /// create its entities and start polling.
    ///
    /// A failed first refresh leaves nothing registered.
    pub async fn setup_entry(&self, entry: ConfigEntry) -> AdmobResult<Arc<EntryRuntime>> {
        let key = Self::key(&entry);
        if self.entries.read().await.contains_key(&key) {
            return Err(AdmobError::CoordinatorAlreadyRunning(entry.title.clone()));
        }

        let source = (self.source_factory)(&entry.data)?;
        let coordinator = UpdateCoordinator::new(
            entry.title.clone(),
            source.clone(),
            self.coordinator_config.clone(),
        );

        coordinator.first_refresh().await?;

        let runtime = Arc::new(EntryRuntime::new(entry, source, coordinator.clone()));

        let mut entries = self.entries.write().await;
        if entries.contains_key(&key) {
            return Err(AdmobError::CoordinatorAlreadyRunning(runtime.entry.title.clone()));
        }
        coordinator.start().await?;
        entries.insert(key, runtime.clone());

        info!(
            "Set up entry {} with {} sensors",
            runtime.entry.title,
            runtime.sensors.len()
        );
        Ok(runtime)
    }

    /// Stop polling and forget the entry.
    pub async fn unload_entry(&self, domain: &str, entry_id: &str) -> AdmobResult<()> {
        let key = (domain.to_string(), entry_id.to_string());
        let runtime = self
            .entries
            .write()
            .await
            .remove(&key)
            .ok_or_else(|| AdmobError::EntryNotFound(entry_id.to_string()))?;

        if let Err(e) = runtime.coordinator.stop().await {
            warn!("Coordinator for {} was not running: {}", entry_id, e);
        }

        debug!("Unloaded entry {}", entry_id);
        Ok(())
    }

    pub async fn unload_all(&self) {
        let keys: Vec<RegistryKey> = self.entries.read().await.keys().cloned().collect();
        for (domain, entry_id) in keys {
            let _ = self.unload_entry(&domain, &entry_id).await;
        }
    }

    pub async fn get(&self, domain: &str, entry_id: &str) -> Option<Arc<EntryRuntime>> {
        self.entries
            .read()
            .await
            .get(&(domain.to_string(), entry_id.to_string()))
            .cloned()
    }

    pub async fn runtimes(&self) -> Vec<Arc<EntryRuntime>> {
        self.entries.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
