use std::sync::Arc;

use crate::api::DynStatsSource;
use crate::coordinator::{DataCoordinator, DynCoordinator, UpdateCoordinator};
use crate::entities::{
    build_button, build_sensors, AdMobRefreshButton, BoxedSensor, Entity, EntityState, Sensor,
};
use crate::setup::ConfigEntry;

/// Everything one loaded config entry owns.
pub struct EntryRuntime {
    pub entry: ConfigEntry,
    pub source: DynStatsSource,
    pub coordinator: Arc<UpdateCoordinator>,
    pub sensors: Vec<BoxedSensor>,
    pub button: AdMobRefreshButton,
}

impl std::fmt::Debug for EntryRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryRuntime")
            .field("entry", &self.entry)
            .finish_non_exhaustive()
    }
}

impl EntryRuntime {
    pub fn new(
        entry: ConfigEntry,
        source: DynStatsSource,
        coordinator: Arc<UpdateCoordinator>,
    ) -> Self {
        let dyn_coordinator: DynCoordinator = coordinator.clone();
        let sensors = build_sensors(&dyn_coordinator, &entry.entry_id);
        let button = build_button(&dyn_coordinator, &entry.entry_id);

        Self {
            entry,
            source,
            coordinator,
            sensors,
            button,
        }
    }

    pub fn entry_id(&self) -> &str {
        &self.entry.entry_id
    }

    pub fn sensor_states(&self) -> Vec<EntityState> {
        self.sensors.iter().map(|s| s.state()).collect()
    }

    pub fn sensor(&self, unique_id: &str) -> Option<&dyn Sensor> {
        self.sensors
            .iter()
            .find(|s| s.unique_id() == unique_id)
            .map(|s| &**s)
    }

    pub fn is_available(&self) -> bool {
        self.coordinator.last_update_success()
    }
}
