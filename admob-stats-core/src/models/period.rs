use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AdmobError;

/// One of the four fixed calendar windows a report is aggregated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    Today,
    Yesterday,
    ThisMonth,
    LastMonth,
}

impl ReportPeriod {
    pub const ALL: [ReportPeriod; 4] = [
        ReportPeriod::Today,
        ReportPeriod::Yesterday,
        ReportPeriod::ThisMonth,
        ReportPeriod::LastMonth,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ReportPeriod::Today => "today",
            ReportPeriod::Yesterday => "yesterday",
            ReportPeriod::ThisMonth => "this_month",
            ReportPeriod::LastMonth => "last_month",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportPeriod::Today => "Today",
            ReportPeriod::Yesterday => "Yesterday",
            ReportPeriod::ThisMonth => "This Month",
            ReportPeriod::LastMonth => "Last Month",
        }
    }

    /// Inclusive date range covered by this period when the current local date is `today`.
    pub fn date_range(&self, today: NaiveDate) -> DateRange {
        let first_of_month = today.with_day(1).unwrap_or(today);

        match self {
            ReportPeriod::Today => DateRange::single(today),
            ReportPeriod::Yesterday => DateRange::single(today.pred_opt().unwrap_or(today)),
            ReportPeriod::ThisMonth => DateRange::new(first_of_month, today),
            ReportPeriod::LastMonth => {
                let last_month_end = first_of_month.pred_opt().unwrap_or(first_of_month);
                let last_month_start = last_month_end.with_day(1).unwrap_or(last_month_end);
                DateRange::new(last_month_start, last_month_end)
            }
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ReportPeriod {
    type Err = AdmobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "today" => Ok(ReportPeriod::Today),
            "yesterday" => Ok(ReportPeriod::Yesterday),
            "this_month" => Ok(ReportPeriod::ThisMonth),
            "last_month" => Ok(ReportPeriod::LastMonth),
            other => Err(AdmobError::InvalidInput {
                field: "period".to_string(),
                message: format!(
                    "Unknown period '{}', expected today, yesterday, this_month or last_month",
                    other
                ),
            }),
        }
    }
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}..{}", self.start, self.end)
        }
    }
}

/// One of the four metrics requested for every report range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Earnings,
    Impressions,
    AdRequests,
    Clicks,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Earnings,
        Metric::Impressions,
        Metric::AdRequests,
        Metric::Clicks,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Metric::Earnings => "earnings",
            Metric::Impressions => "impressions",
            Metric::AdRequests => "ad_requests",
            Metric::Clicks => "clicks",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Earnings => "Earnings",
            Metric::Impressions => "Impressions",
            Metric::AdRequests => "Ad Requests",
            Metric::Clicks => "Clicks",
        }
    }

    /// Name used by the reporting API in `metrics` and `metricValues`.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Metric::Earnings => "ESTIMATED_EARNINGS",
            Metric::Impressions => "IMPRESSIONS",
            Metric::AdRequests => "AD_REQUESTS",
            Metric::Clicks => "CLICKS",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Metric::Earnings => "mdi:currency-usd",
            Metric::Impressions => "mdi:eye",
            Metric::AdRequests => "mdi:server-network",
            Metric::Clicks => "mdi:cursor-default-click",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
