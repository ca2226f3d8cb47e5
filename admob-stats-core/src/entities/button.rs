use async_trait::async_trait;
use tracing::info;

use crate::coordinator::DynCoordinator;

use super::traits::{Button, Entity};
use super::types::{DeviceInfo, EntityDescription};

/// Triggers an out-of-schedule refresh of the entry's coordinator.
pub struct AdMobRefreshButton {
    coordinator: DynCoordinator,
    description: EntityDescription,
    device_info: DeviceInfo,
}

impl AdMobRefreshButton {
    pub fn new(coordinator: DynCoordinator, entry_id: &str) -> Self {
        let description = EntityDescription {
            unique_id: format!("{}_refresh_button", entry_id),
            name: "AdMob Refresh Data".to_string(),
            icon: "mdi:refresh".to_string(),
            unit_of_measurement: None,
            state_class: None,
        };

        Self {
            coordinator,
            description,
            device_info: DeviceInfo::for_entry(entry_id),
        }
    }
}

impl Entity for AdMobRefreshButton {
    fn description(&self) -> &EntityDescription {
        &self.description
    }

    fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }

    fn available(&self) -> bool {
        true
    }
}

#[async_trait]
impl Button for AdMobRefreshButton {
    async fn press(&self) {
        info!("Manual refresh button pressed");
        self.coordinator.request_refresh().await;
    }
}

pub fn build_button(coordinator: &DynCoordinator, entry_id: &str) -> AdMobRefreshButton {
    AdMobRefreshButton::new(coordinator.clone(), entry_id)
}
