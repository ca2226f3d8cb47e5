pub mod entries;
pub mod run;
pub mod setup;
pub mod stats;

pub use entries::{handle_entries_command, EntriesCommand};
pub use run::cmd_run;
pub use setup::{cmd_setup, SetupArgs};
pub use stats::{cmd_sensors, cmd_stats};
