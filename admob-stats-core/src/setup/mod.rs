pub mod entry;
pub mod flow;
pub mod store;

pub use entry::{entry_title, ConfigEntry, ENTRY_VERSION};
pub use flow::{ConfigFlow, FlowResult, SETUP_URL};
pub use store::ConfigEntryStore;
