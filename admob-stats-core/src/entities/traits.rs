use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::models::MetricValue;

use super::types::{DeviceInfo, EntityDescription, EntityState};

pub trait Entity: Send + Sync {
    fn description(&self) -> &EntityDescription;

    fn device_info(&self) -> &DeviceInfo;

    /// Whether the last refresh of the backing coordinator succeeded.
    fn available(&self) -> bool;

    fn unique_id(&self) -> &str {
        &self.description().unique_id
    }

    fn name(&self) -> &str {
        &self.description().name
    }
}

/// A read-only projection of the coordinator's current snapshot.
pub trait Sensor: Entity {
    /// `None` until the snapshot contains this sensor's period.
    fn native_value(&self) -> Option<MetricValue>;

    fn extra_state_attributes(&self) -> BTreeMap<String, MetricValue> {
        BTreeMap::new()
    }

    fn state(&self) -> EntityState {
        let description = self.description();
        EntityState {
            unique_id: description.unique_id.clone(),
            name: description.name.clone(),
            state: self.native_value(),
            available: self.available(),
            unit_of_measurement: description.unit_of_measurement.clone(),
            icon: description.icon.clone(),
            attributes: self.extra_state_attributes(),
        }
    }
}

#[async_trait]
pub trait Button: Entity {
    async fn press(&self);
}

pub type BoxedSensor = Box<dyn Sensor>;
