use std::collections::HashMap;

use crate::error::{AdmobError, AdmobResult};
use crate::models::{Metric, MetricRecord};

use super::types::{ReportStreamItem, WireMetricValue};

const MICROS_PER_UNIT: f64 = 1_000_000.0;

/// Decode a report response body. An empty body is an empty report.
pub fn parse_report(body: &str) -> AdmobResult<Vec<ReportStreamItem>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(body).map_err(|e| AdmobError::ApiParseError(e.to_string()))
}

/// Sum every row of a report response into one record.
///
/// Header and footer items are ignored, absent metrics count as zero, and
/// earnings are converted from micros and rounded to cents at the end.
pub fn reduce_report(items: &[ReportStreamItem]) -> AdmobResult<MetricRecord> {
    let mut total_micros: i128 = 0;
    let mut record = MetricRecord::zero();

    for row in items.iter().filter_map(|item| item.row.as_ref()) {
        let values = &row.metric_values;

        total_micros = total_micros
            .checked_add(micros(values.get(Metric::Earnings.wire_name()))?)
            .ok_or_else(|| overflow(Metric::Earnings))?;
        record.impressions = accumulate(record.impressions, values, Metric::Impressions)?;
        record.ad_requests = accumulate(record.ad_requests, values, Metric::AdRequests)?;
        record.clicks = accumulate(record.clicks, values, Metric::Clicks)?;
    }

    record.earnings = round_cents(total_micros as f64 / MICROS_PER_UNIT);
    Ok(record)
}

/// Round to cents, halves going to the even cent.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round_ties_even() / 100.0
}

fn accumulate(
    total: u64,
    values: &HashMap<String, WireMetricValue>,
    metric: Metric,
) -> AdmobResult<u64> {
    total
        .checked_add(count(values.get(metric.wire_name()))?)
        .ok_or_else(|| overflow(metric))
}

fn overflow(metric: Metric) -> AdmobError {
    AdmobError::ApiParseError(format!("{} total overflows", metric.wire_name()))
}

fn micros(value: Option<&WireMetricValue>) -> AdmobResult<i128> {
    match value.and_then(|v| v.micros_value.as_deref()) {
        Some(raw) => raw
            .trim()
            .parse::<i128>()
            .map_err(|e| AdmobError::ApiParseError(format!("microsValue '{}': {}", raw, e))),
        None => Ok(0),
    }
}

fn count(value: Option<&WireMetricValue>) -> AdmobResult<u64> {
    match value.and_then(|v| v.integer_value.as_deref()) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|e| AdmobError::ApiParseError(format!("integerValue '{}': {}", raw, e))),
        None => Ok(0),
    }
}
