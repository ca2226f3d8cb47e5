use admob_stats_core::{
    admob_source_factory, AppConfig, ConfigEntry, ConfigEntryStore, CoordinatorConfig,
    SourceFactory,
};
use anyhow::{anyhow, bail, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loaded configuration plus the handles every command needs.
pub struct CliContext {
    pub config: AppConfig,
    pub store: Arc<ConfigEntryStore>,
}

impl CliContext {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                if !path.exists() {
                    bail!("Configuration file not found: {}", path.display());
                }
                AppConfig::load_from_paths(vec![path.to_path_buf()])
            }
            None => AppConfig::load(),
        }
        .context("Failed to load configuration")?;

        let entries_path = config
            .entries_path()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(Self {
            config,
            store: Arc::new(ConfigEntryStore::new(entries_path)),
        })
    }

    pub fn entries_path(&self) -> PathBuf {
        self.store.path().to_path_buf()
    }

    pub fn source_factory(&self) -> SourceFactory {
        admob_source_factory(self.config.api.clone())
    }

    pub fn coordinator_config(&self) -> CoordinatorConfig {
        self.config.polling.clone().into()
    }

    /// The named entry, or every entry when `entry_id` is `None`.
    pub async fn select_entries(&self, entry_id: Option<&str>) -> Result<Vec<ConfigEntry>> {
        let entries = match entry_id {
            Some(id) => vec![self.store.get(id).await?],
            None => self.store.list().await?,
        };

        if entries.is_empty() {
            bail!("No AdMob accounts configured. Run 'admob-stats setup' first");
        }

        Ok(entries)
    }
}
