//! REST client and wire types for the parking/amenity backend.

pub mod client;
pub mod error;
pub mod source;
pub mod types;

pub use client::BackendClient;
pub use error::BackendError;
pub use source::{AmenityStore, CandidateSource};
pub use types::{CoordinateFields, RankRequest, RawAmenityRow, RawCandidate};
