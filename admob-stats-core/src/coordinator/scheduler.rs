use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{oneshot, watch, Mutex, RwLock};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::api::DynStatsSource;
use crate::error::{AdmobError, AdmobResult};
use crate::models::MetricSnapshot;

use super::traits::DataCoordinator;
use super::types::{CoordinatorConfig, CoordinatorState};

/// Owns the current [`MetricSnapshot`], refreshes it on a timer and on request,
/// and notifies every subscriber after each refresh.
pub struct UpdateCoordinator {
    this: Weak<UpdateCoordinator>,
    name: String,
    source: DynStatsSource,
    config: CoordinatorConfig,
    state_tx: watch::Sender<CoordinatorState>,
    refresh_lock: Mutex<()>,
    last_manual_refresh: Mutex<Option<Instant>>,
    refresh_pending: AtomicBool,
    running: RwLock<bool>,
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl UpdateCoordinator {
    pub fn new(
        name: impl Into<String>,
        source: DynStatsSource,
        config: CoordinatorConfig,
    ) -> Arc<Self> {
        let (state_tx, _) = watch::channel(CoordinatorState::default());

        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            name: name.into(),
            source,
            config,
            state_tx,
            refresh_lock: Mutex::new(()),
            last_manual_refresh: Mutex::new(None),
            refresh_pending: AtomicBool::new(false),
            running: RwLock::new(false),
            shutdown_tx: Mutex::new(None),
        })
    }

    pub fn update_interval(&self) -> Duration {
        self.config.update_interval
    }

    pub fn state(&self) -> CoordinatorState {
        self.state_tx.borrow().clone()
    }

    /// Fetch once and publish the outcome.
    ///
    /// A successful fetch replaces the snapshot wholesale. A failed fetch keeps
    /// the previous snapshot and flips `last_update_success`.
    pub async fn refresh(&self) -> AdmobResult<()> {
        let _guard = self.refresh_lock.lock().await;
        let start_time = std::time::Instant::now();

        match self.source.fetch_stats().await {
            Ok(snapshot) => {
                let recovered = {
                    let state = self.state_tx.borrow();
                    !state.last_update_success && state.refresh_count > 0
                };

                self.state_tx.send_modify(|state| {
                    state.data = Some(snapshot);
                    state.last_update_success = true;
                    state.last_updated = Some(Utc::now());
                    state.last_error = None;
                    state.refresh_count += 1;
                });

                if recovered {
                    info!("Fetching {} data recovered", self.name);
                }
                debug!(
                    "Finished fetching {} data in {}ms (success: true)",
                    self.name,
                    start_time.elapsed().as_millis()
                );
                Ok(())
            }
            Err(e) => {
                let first_failure = {
                    let state = self.state_tx.borrow();
                    state.last_update_success || state.refresh_count == 0
                };
                let message = e.to_string();

                self.state_tx.send_modify(|state| {
                    state.last_update_success = false;
                    state.last_updated = Some(Utc::now());
                    state.last_error = Some(message.clone());
                    state.refresh_count += 1;
                });

                // Only the first failure in a row is worth an error line.
                if first_failure {
                    error!("Error fetching {} data: {}", self.name, e);
                } else {
                    debug!("Error fetching {} data: {}", self.name, e);
                }

                Err(AdmobError::RefreshFailed {
                    name: self.name.clone(),
                    message,
                })
            }
        }
    }

    /// The refresh run during setup. Its error means the entry is not ready.
    pub async fn first_refresh(&self) -> AdmobResult<()> {
        if let Err(e) = self.refresh().await {
            warn!("Initial refresh of {} failed, entry not ready", self.name);
            return Err(e);
        }
        Ok(())
    }

    /// Time left in the manual refresh cooldown. `None` opens a new window.
    async fn claim_cooldown(&self) -> Option<Duration> {
        let mut last = self.last_manual_refresh.lock().await;
        let now = Instant::now();

        if let Some(previous) = *last {
            let elapsed = now.duration_since(previous);
            if elapsed < self.config.refresh_cooldown {
                return Some(self.config.refresh_cooldown - elapsed);
            }
        }

        *last = Some(now);
        None
    }

    /// Run one refresh once the cooldown is over. Requests arriving while one
    /// is already scheduled fold into it.
    fn schedule_trailing_refresh(&self, delay: Duration) {
        if self.refresh_pending.swap(true, Ordering::SeqCst) {
            debug!("Refresh of {} already scheduled", self.name);
            return;
        }

        let Some(this) = self.this.upgrade() else {
            return;
        };

        debug!(
            "Refresh of {} requested within cooldown, deferring {}ms",
            self.name,
            delay.as_millis()
        );

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.refresh_pending.store(false, Ordering::SeqCst);
            this.request_refresh().await;
        });
    }

    pub async fn start(self: &Arc<Self>) -> AdmobResult<()> {
        let mut running = self.running.write().await;
        if *running {
            return Err(AdmobError::CoordinatorAlreadyRunning(self.name.clone()));
        }
        *running = true;
        drop(running);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        *self.shutdown_tx.lock().await = Some(shutdown_tx);

        let this = Arc::clone(self);
        tokio::spawn(async move {
            this.background_loop(shutdown_rx).await;
        });

        info!(
            "Coordinator {} started with interval: {} seconds",
            self.name,
            self.config.update_interval.as_secs()
        );
        Ok(())
    }

    pub async fn stop(&self) -> AdmobResult<()> {
        let mut running = self.running.write().await;
        if !*running {
            return Err(AdmobError::CoordinatorNotRunning(self.name.clone()));
        }
        *running = false;
        drop(running);

        if let Some(tx) = self.shutdown_tx.lock().await.take() {
            let _ = tx.send(());
        }

        info!("Coordinator {} stopped", self.name);
        Ok(())
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    async fn background_loop(self: Arc<Self>, mut shutdown_rx: oneshot::Receiver<()>) {
        let mut ticker = interval(self.config.update_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first tick fires immediately; setup already did the first refresh.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !*self.running.read().await {
                        break;
                    }

                    debug!("Running scheduled refresh of {}", self.name);
                    let _ = self.refresh().await;
                }
                _ = &mut shutdown_rx => {
                    debug!("Coordinator {} shutting down", self.name);
                    break;
                }
            }
        }
    }
}

#[async_trait]
impl DataCoordinator for UpdateCoordinator {
    fn name(&self) -> &str {
        &self.name
    }

    fn data(&self) -> Option<MetricSnapshot> {
        self.state_tx.borrow().data.clone()
    }

    fn last_update_success(&self) -> bool {
        self.state_tx.borrow().last_update_success
    }

    fn subscribe(&self) -> watch::Receiver<CoordinatorState> {
        self.state_tx.subscribe()
    }

    async fn request_refresh(&self) {
        if let Some(remaining) = self.claim_cooldown().await {
            self.state_tx.send_modify(|_| {});
            self.schedule_trailing_refresh(remaining);
            return;
        }

        let _ = self.refresh().await;
    }
}
