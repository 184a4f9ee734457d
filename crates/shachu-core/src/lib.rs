//! Shared domain types, geo math and configuration for the shachu workspace.

pub mod app_config;
pub mod config;
pub mod error;
pub mod geo;
pub mod policy;
pub mod spots;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use geo::{
    delta_for_radius, haversine_m, walking_minutes, Coordinate, SearchRegion, EARTH_RADIUS_M,
    WALKING_PACE_M_PER_MIN,
};
pub use policy::{load_policy, AmenityPolicies, AmenityPolicy, SearchPolicy};
pub use spots::{load_spots, SpotConfig, SpotsFile};
pub use types::{
    fees_are_ordered, Amenity, AmenityCategory, OvernightWindow, ParkingCandidate,
    RankedResultSet,
};
