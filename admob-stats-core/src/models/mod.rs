mod credentials;
mod period;
mod snapshot;

pub use credentials::Credentials;
pub use period::{DateRange, Metric, ReportPeriod};
pub use snapshot::{MetricRecord, MetricSnapshot, MetricValue};
