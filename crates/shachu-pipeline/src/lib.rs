//! Geospatial enrichment of overnight-parking candidates.
//!
//! Given a center and an overnight window, [`Pipeline::run`] asks the
//! fee-aware ranking procedure for candidates, annotates each with its
//! nearest amenities and returns a capped, fee-ordered [`RankedResultSet`].
//!
//! [`RankedResultSet`]: shachu_core::RankedResultSet

pub mod enrich;
pub mod fetcher;
pub mod matcher;
pub mod normalize;
pub mod pipeline;
pub mod rank;

#[cfg(test)]
mod test_support;

pub use enrich::enrich;
pub use fetcher::fetch_candidates;
pub use matcher::{find_nearest, nearest_within};
pub use normalize::{decode_hint, merge_amenity, normalize, resolve_coordinate, NormalizedCandidate};
pub use pipeline::Pipeline;
pub use rank::finalize;
