use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::models::{DateRange, Metric};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    pub report_spec: NetworkReportSpec,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkReportSpec {
    pub date_range: WireDateRange,
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
    pub sort_conditions: Vec<SortCondition>,
}

impl NetworkReportSpec {
    /// Daily breakdown of all four metrics, newest day first.
    pub fn daily(range: DateRange) -> Self {
        Self {
            date_range: range.into(),
            dimensions: vec!["DATE".to_string()],
            metrics: Metric::ALL
                .iter()
                .map(|m| m.wire_name().to_string())
                .collect(),
            sort_conditions: vec![SortCondition {
                dimension: "DATE".to_string(),
                order: "DESCENDING".to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDateRange {
    pub start_date: WireDate,
    pub end_date: WireDate,
}

impl From<DateRange> for WireDateRange {
    fn from(range: DateRange) -> Self {
        Self {
            start_date: range.start.into(),
            end_date: range.end.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct WireDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl From<NaiveDate> for WireDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SortCondition {
    pub dimension: String,
    pub order: String,
}

/// One element of the streamed report response. Exactly one of the fields is set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStreamItem {
    #[serde(default)]
    pub header: Option<serde_json::Value>,
    #[serde(default)]
    pub row: Option<ReportRow>,
    #[serde(default)]
    pub footer: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    #[serde(default)]
    pub dimension_values: HashMap<String, DimensionValue>,
    #[serde(default)]
    pub metric_values: HashMap<String, WireMetricValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionValue {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub display_label: Option<String>,
}

/// int64 values arrive as decimal strings; plain numbers are accepted too.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMetricValue {
    #[serde(default, deserialize_with = "int64_string")]
    pub integer_value: Option<String>,
    #[serde(default, deserialize_with = "int64_string")]
    pub micros_value: Option<String>,
    #[serde(default)]
    pub double_value: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

fn int64_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    }))
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublisherAccount {
    pub name: String,
    #[serde(default)]
    pub publisher_id: Option<String>,
    #[serde(default)]
    pub reporting_time_zone: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
}
