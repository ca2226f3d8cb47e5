use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

use crate::models::MetricSnapshot;

use super::types::CoordinatorState;

/// The contract entities rely on: one refreshable snapshot plus change notifications.
#[async_trait]
pub trait DataCoordinator: Send + Sync {
    fn name(&self) -> &str;

    fn data(&self) -> Option<MetricSnapshot>;

    fn last_update_success(&self) -> bool;

    fn subscribe(&self) -> watch::Receiver<CoordinatorState>;

    /// Refresh outside the regular schedule. Failures land in the state, not here.
    async fn request_refresh(&self);
}

pub type DynCoordinator = Arc<dyn DataCoordinator>;

