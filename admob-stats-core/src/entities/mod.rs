pub mod button;
pub mod sensor;
pub mod traits;
pub mod types;

pub use button::{build_button, AdMobRefreshButton};
pub use sensor::{build_sensors, AdMobEarningsSensor, AdMobMetricSensor};
pub use traits::{BoxedSensor, Button, Entity, Sensor};
pub use types::{DeviceInfo, EntityDescription, EntityState, StateClass};
