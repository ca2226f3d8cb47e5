use std::collections::BTreeMap;

use crate::coordinator::DynCoordinator;
use crate::models::{Metric, MetricRecord, MetricValue, ReportPeriod};

use super::traits::{BoxedSensor, Entity, Sensor};
use super::types::{DeviceInfo, EntityDescription, StateClass};

/// Earnings for one period, with the period's counts as attributes.
pub struct AdMobEarningsSensor {
    coordinator: DynCoordinator,
    period: ReportPeriod,
    description: EntityDescription,
    device_info: DeviceInfo,
}

impl AdMobEarningsSensor {
    pub fn new(coordinator: DynCoordinator, entry_id: &str, period: ReportPeriod) -> Self {
        let description = EntityDescription {
            unique_id: format!("admob_{}_earnings", period.key()),
            name: format!("AdMob {} Earnings", period.label()),
            icon: Metric::Earnings.icon().to_string(),
            unit_of_measurement: Some("$".to_string()),
            state_class: Some(StateClass::Total),
        };

        Self {
            coordinator,
            period,
            description,
            device_info: DeviceInfo::for_entry(entry_id),
        }
    }

    pub fn period(&self) -> ReportPeriod {
        self.period
    }

    fn record(&self) -> Option<MetricRecord> {
        self.coordinator
            .data()
            .and_then(|snapshot| snapshot.get(self.period).copied())
    }
}

impl Entity for AdMobEarningsSensor {
    fn description(&self) -> &EntityDescription {
        &self.description
    }

    fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }

    fn available(&self) -> bool {
        self.coordinator.last_update_success()
    }
}

impl Sensor for AdMobEarningsSensor {
    fn native_value(&self) -> Option<MetricValue> {
        self.record().map(|r| r.value(Metric::Earnings))
    }

    fn extra_state_attributes(&self) -> BTreeMap<String, MetricValue> {
        let Some(record) = self.record() else {
            return BTreeMap::new();
        };

        [Metric::Impressions, Metric::AdRequests, Metric::Clicks]
            .into_iter()
            .map(|metric| (metric.key().to_string(), record.value(metric)))
            .collect()
    }
}

/// A single count metric for one period.
pub struct AdMobMetricSensor {
    coordinator: DynCoordinator,
    period: ReportPeriod,
    metric: Metric,
    description: EntityDescription,
    device_info: DeviceInfo,
}

impl AdMobMetricSensor {
    pub fn new(
        coordinator: DynCoordinator,
        entry_id: &str,
        period: ReportPeriod,
        metric: Metric,
    ) -> Self {
        let description = EntityDescription {
            unique_id: format!("admob_{}_{}", period.key(), metric.key()),
            name: format!("AdMob {} {}", period.label(), metric.label()),
            icon: metric.icon().to_string(),
            unit_of_measurement: None,
            state_class: Some(StateClass::Total),
        };

        Self {
            coordinator,
            period,
            metric,
            description,
            device_info: DeviceInfo::for_entry(entry_id),
        }
    }

    pub fn period(&self) -> ReportPeriod {
        self.period
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }
}

impl Entity for AdMobMetricSensor {
    fn description(&self) -> &EntityDescription {
        &self.description
    }

    fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }

    fn available(&self) -> bool {
        self.coordinator.last_update_success()
    }
}

impl Sensor for AdMobMetricSensor {
    fn native_value(&self) -> Option<MetricValue> {
        self.coordinator
            .data()
            .and_then(|snapshot| snapshot.value(self.period, self.metric))
    }
}

/// All sixteen sensors of one entry, grouped by period.
pub fn build_sensors(coordinator: &DynCoordinator, entry_id: &str) -> Vec<BoxedSensor> {
    let mut sensors: Vec<BoxedSensor> = Vec::with_capacity(ReportPeriod::ALL.len() * 4);

    for period in ReportPeriod::ALL {
        sensors.push(Box::new(AdMobEarningsSensor::new(
            coordinator.clone(),
            entry_id,
            period,
        )));

        for metric in [Metric::Impressions, Metric::AdRequests, Metric::Clicks] {
            sensors.push(Box::new(AdMobMetricSensor::new(
                coordinator.clone(),
                entry_id,
                period,
                metric,
            )));
        }
    }

    sensors
}
