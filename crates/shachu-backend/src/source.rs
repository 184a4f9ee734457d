//! Seams between the enrichment pipeline and its data providers.
//!
//! [`crate::BackendClient`] implements both traits over HTTP; tests supply
//! in-memory implementations.

use std::future::Future;

use shachu_core::{AmenityCategory, OvernightWindow, SearchRegion};

use crate::error::BackendError;
use crate::types::{RawAmenityRow, RawCandidate};

/// The fee-aware ranking procedure.
///
/// Implementations return rows sorted by computed fee ascending with unknown
/// fees last, and must be idempotent for identical inputs over the same data.
pub trait CandidateSource: Sync {
    fn rank(
        &self,
        region: &SearchRegion,
        window: &OvernightWindow,
    ) -> impl Future<Output = Result<Vec<RawCandidate>, BackendError>> + Send;
}

/// Amenity rows queryable by bounding box.
pub trait AmenityStore: Sync {
    fn query(
        &self,
        category: AmenityCategory,
        table: &str,
        region: &SearchRegion,
    ) -> impl Future<Output = Result<Vec<RawAmenityRow>, BackendError>> + Send;
}

impl<T: CandidateSource> CandidateSource for &T {
    fn rank(
        &self,
        region: &SearchRegion,
        window: &OvernightWindow,
    ) -> impl Future<Output = Result<Vec<RawCandidate>, BackendError>> + Send {
        (**self).rank(region, window)
    }
}

impl<T: AmenityStore> AmenityStore for &T {
    fn query(
        &self,
        category: AmenityCategory,
        table: &str,
        region: &SearchRegion,
    ) -> impl Future<Output = Result<Vec<RawAmenityRow>, BackendError>> + Send {
        (**self).query(category, table, region)
    }
}
