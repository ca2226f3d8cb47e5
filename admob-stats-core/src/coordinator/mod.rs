pub mod scheduler;
pub mod traits;
pub mod types;

pub use scheduler::UpdateCoordinator;
pub use traits::{DataCoordinator, DynCoordinator};
pub use types::{CoordinatorConfig, CoordinatorState};
