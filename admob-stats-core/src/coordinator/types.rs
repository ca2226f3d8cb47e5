use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::PollingConfig;
use crate::models::MetricSnapshot;

/// What subscribers see after every refresh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoordinatorState {
    /// Last successfully fetched snapshot. Survives failed refreshes.
    pub data: Option<MetricSnapshot>,
    pub last_update_success: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub refresh_count: u64,
}

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub update_interval: Duration,
    /// Manual refresh requests inside this window collapse into one refresh at its end.
    pub refresh_cooldown: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        PollingConfig::default().into()
    }
}

impl From<PollingConfig> for CoordinatorConfig {
    fn from(config: PollingConfig) -> Self {
        Self {
            update_interval: config.interval(),
            refresh_cooldown: config.refresh_cooldown(),
        }
    }
}
