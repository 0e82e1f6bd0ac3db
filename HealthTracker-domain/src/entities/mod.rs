// Domain entities exchanged with the HealthTracker REST backend
pub mod blood_pressure;
pub mod points;
pub mod preferences;
pub mod weight;

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

// Re-export common types for easier imports
pub use blood_pressure::BloodPressure;
pub use points::Points;
pub use preferences::{Preferences, Units};
pub use weight::Weight;

/// A record persisted by the backend and transferred as JSON.
///
/// Implementors describe where the entity lives in the REST API; date
/// conversion is handled by their serde attributes.
pub trait Entity: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Path segment of the resource below `/api`, e.g. `blood-pressures`
    const RESOURCE_PATH: &'static str;

    /// Entity name used in log lines and backend alert keys
    const ENTITY_NAME: &'static str;

    /// Server-assigned identifier, absent before creation
    fn id(&self) -> Option<i64>;

    /// Replace the identifier
    fn set_id(&mut self, id: Option<i64>);
}
