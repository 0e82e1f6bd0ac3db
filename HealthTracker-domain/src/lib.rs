// HealthTracker Domain
// Entities and wire-format helpers shared by the client crates

// Domain entities
pub mod entities;

// Local date conversion between server and client representations
pub mod date_utils;

// Query options for collection requests
pub mod request;

// Pagination headers
pub mod pagination;

// Re-export common types for easier imports
pub use date_utils::DateError;
pub use entities::{BloodPressure, Entity, Points, Preferences, Units, Weight};
pub use pagination::{PageLinks, PaginationError};
pub use request::RequestOptions;
