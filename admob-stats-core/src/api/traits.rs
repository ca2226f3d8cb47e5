use async_trait::async_trait;
use std::sync::Arc;

use crate::error::AdmobResult;
use crate::models::{Credentials, MetricSnapshot};

/// Anything that can produce a fresh [`MetricSnapshot`] on demand.
#[async_trait]
pub trait StatsSource: Send + Sync {
    fn source_name(&self) -> &str;

    /// One authenticated read against the account. Any failure is an error.
    async fn test_connection(&self) -> AdmobResult<bool>;

    /// Fetch all four periods. Must be safe to call from any task.
    async fn fetch_stats(&self) -> AdmobResult<MetricSnapshot>;
}

pub type DynStatsSource = Arc<dyn StatsSource>;

/// Builds a [`StatsSource`] for a set of credentials.
pub type SourceFactory = Arc<dyn Fn(&Credentials) -> AdmobResult<DynStatsSource> + Send + Sync>;
