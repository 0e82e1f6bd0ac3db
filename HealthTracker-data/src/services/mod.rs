pub mod entity_service;

// REST services
// One generic implementation, instantiated per entity.

use health_tracker_domain::{BloodPressure, Points, Preferences, Weight};

use crate::config::ClientConfig;
use crate::errors::ClientResult;
use crate::transport::ReqwestTransport;

pub use entity_service::{EntityService, EntityServiceTrait};

/// Service for `/api/blood-pressures`
pub type BloodPressureService = EntityService<BloodPressure, ReqwestTransport>;

/// Service for `/api/preferences`
pub type PreferencesService = EntityService<Preferences, ReqwestTransport>;

/// Service for `/api/weights`
pub type WeightService = EntityService<Weight, ReqwestTransport>;

/// Service for `/api/points`
pub type PointsService = EntityService<Points, ReqwestTransport>;

/// Create a blood pressure service for the configured backend
pub fn create_default_blood_pressure_service(config: &ClientConfig) -> ClientResult<BloodPressureService> {
    EntityService::from_config(config)
}

/// Create a preferences service for the configured backend
pub fn create_default_preferences_service(config: &ClientConfig) -> ClientResult<PreferencesService> {
    EntityService::from_config(config)
}

/// Create a weight service for the configured backend
pub fn create_default_weight_service(config: &ClientConfig) -> ClientResult<WeightService> {
    EntityService::from_config(config)
}

/// Create a points service for the configured backend
pub fn create_default_points_service(config: &ClientConfig) -> ClientResult<PointsService> {
    EntityService::from_config(config)
}
