use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::period::{Metric, ReportPeriod};

/// Aggregated totals for one report range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricRecord {
    pub earnings: f64,
    pub impressions: u64,
    pub ad_requests: u64,
    pub clicks: u64,
}

impl MetricRecord {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    pub fn value(&self, metric: Metric) -> MetricValue {
        match metric {
            Metric::Earnings => MetricValue::Currency(self.earnings),
            Metric::Impressions => MetricValue::Count(self.impressions),
            Metric::AdRequests => MetricValue::Count(self.ad_requests),
            Metric::Clicks => MetricValue::Count(self.clicks),
        }
    }
}

/// A single sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Currency(f64),
    Count(u64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Currency(amount) => write!(f, "{:.2}", amount),
            MetricValue::Count(count) => write!(f, "{}", count),
        }
    }
}

/// The complete set of period records produced by one fetch.
///
/// A snapshot replaces its predecessor wholesale; nothing is merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub periods: BTreeMap<ReportPeriod, MetricRecord>,
    pub fetched_at: DateTime<Utc>,
}

impl MetricSnapshot {
    pub fn new() -> Self {
        Self {
            periods: BTreeMap::new(),
            fetched_at: Utc::now(),
        }
    }

    pub fn insert(&mut self, period: ReportPeriod, record: MetricRecord) {
        self.periods.insert(period, record);
    }

    pub fn with_record(mut self, period: ReportPeriod, record: MetricRecord) -> Self {
        self.insert(period, record);
        self
    }

    pub fn get(&self, period: ReportPeriod) -> Option<&MetricRecord> {
        self.periods.get(&period)
    }

    pub fn value(&self, period: ReportPeriod, metric: Metric) -> Option<MetricValue> {
        self.get(period).map(|record| record.value(metric))
    }

    /// True when every one of the four periods is present.
    pub fn is_complete(&self) -> bool {
        ReportPeriod::ALL.iter().all(|p| self.periods.contains_key(p))
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

impl Default for MetricSnapshot {
    fn default() -> Self {
        Self::new()
    }
}
