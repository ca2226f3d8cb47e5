pub mod entry;
pub mod registry;

pub use entry::EntryRuntime;
pub use registry::IntegrationRegistry;
