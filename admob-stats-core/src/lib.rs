#![allow(
    clippy::needless_borrows_for_generic_args,
    clippy::derivable_impls,
    clippy::type_complexity,
    clippy::len_without_is_empty
)]

pub mod api;
pub mod config;
pub mod coordinator;
pub mod entities;
pub mod error;
pub mod logging;
pub mod models;
pub mod runtime;
pub mod setup;

/// Integration domain; namespaces entries, devices and the registry.
pub const DOMAIN: &str = "admob_stats";

pub use api::{
    admob_source_factory, reduce_report, AdMobClient, DynStatsSource, SourceFactory, StatsSource,
    ADMOB_REPORT_SCOPE,
};
pub use config::{
    get_config_dir, ApiConfig, AppConfig, ConfigLoadError, LoggingConfig, PollingConfig,
    StorageConfig,
};
pub use coordinator::{
    CoordinatorConfig, CoordinatorState, DataCoordinator, DynCoordinator, UpdateCoordinator,
};
pub use entities::{
    build_button, build_sensors, AdMobEarningsSensor, AdMobMetricSensor, AdMobRefreshButton,
    BoxedSensor, Button, DeviceInfo, Entity, EntityDescription, EntityState, Sensor, StateClass,
};
pub use error::{AdmobError, AdmobResult, CliErrorDisplay};
pub use logging::init_logging;
pub use models::{
    Credentials, DateRange, Metric, MetricRecord, MetricSnapshot, MetricValue, ReportPeriod,
};
pub use runtime::{EntryRuntime, IntegrationRegistry};
pub use setup::{ConfigEntry, ConfigEntryStore, ConfigFlow, FlowResult, SETUP_URL};
