use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::models::MetricValue;
use crate::DOMAIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    Measurement,
    Total,
    TotalIncreasing,
}

impl fmt::Display for StateClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateClass::Measurement => write!(f, "measurement"),
            StateClass::Total => write!(f, "total"),
            StateClass::TotalIncreasing => write!(f, "total_increasing"),
        }
    }
}

/// Groups every entity of one config entry under a single device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub identifiers: BTreeSet<(String, String)>,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
}

impl DeviceInfo {
    pub fn for_entry(entry_id: &str) -> Self {
        let mut identifiers = BTreeSet::new();
        identifiers.insert((DOMAIN.to_string(), entry_id.to_string()));

        Self {
            identifiers,
            name: "AdMob Stats".to_string(),
            manufacturer: "Google".to_string(),
            model: "AdMob API".to_string(),
        }
    }
}

/// Static identity of an entity. Nothing here changes after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescription {
    pub unique_id: String,
    pub name: String,
    pub icon: String,
    pub unit_of_measurement: Option<String>,
    pub state_class: Option<StateClass>,
}

/// Point-in-time rendering of a sensor, as shown to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub unique_id: String,
    pub name: String,
    pub state: Option<MetricValue>,
    pub available: bool,
    pub unit_of_measurement: Option<String>,
    pub icon: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub attributes: BTreeMap<String, MetricValue>,
}

impl EntityState {
    /// The state as a display string, `unknown` when there is no value yet.
    pub fn display_state(&self) -> String {
        if !self.available && self.state.is_none() {
            return "unavailable".to_string();
        }
        match self.state {
            Some(value) => value.to_string(),
            None => "unknown".to_string(),
        }
    }
}
