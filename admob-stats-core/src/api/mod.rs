pub mod client;
pub mod report;
pub mod traits;
pub mod types;

pub use client::{admob_source_factory, AdMobClient, ADMOB_REPORT_SCOPE};
pub use report::{parse_report, reduce_report, round_cents};
pub use traits::{DynStatsSource, SourceFactory, StatsSource};
pub use types::{NetworkReportSpec, PublisherAccount, ReportStreamItem};
