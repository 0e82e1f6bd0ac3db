// HealthTracker Data
// This crate talks to the HealthTracker REST backend

// Client configuration
pub mod config;

// Error types shared by every service
pub mod errors;

// Response wrappers and alert headers
pub mod response;

// Entity services
pub mod services;

// HTTP transport
pub mod transport;

// In-memory services and a fake backend for tests
#[cfg(any(test, feature = "mock"))]
pub mod testing;

pub use config::ClientConfig;
pub use errors::{ClientError, ClientResult};
pub use response::{EntityAlert, ResponseWrapper};
pub use services::{
    create_default_blood_pressure_service, create_default_points_service, create_default_preferences_service,
    create_default_weight_service, EntityService, EntityServiceTrait,
};
pub use transport::{ApiRequest, HttpTransport, RawResponse, ReqwestTransport};
