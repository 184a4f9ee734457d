//! Nearest-amenity matching: bounding-box query, exact-distance filter,
//! ascending sort, per-category cap.

use shachu_backend::{AmenityStore, RawAmenityRow};
use shachu_core::{haversine_m, Amenity, AmenityCategory, AmenityPolicy, Coordinate, SearchRegion};

use crate::normalize::resolve_coordinate;

/// Finds up to `policy.max_results` amenities of `category` within
/// `policy.radius_m` of `center`, nearest first.
///
/// A store failure is logged and treated as "none found".
pub async fn find_nearest<S: AmenityStore>(
    store: &S,
    category: AmenityCategory,
    policy: &AmenityPolicy,
    center: Coordinate,
) -> Vec<Amenity> {
    let region = SearchRegion::around(center, policy.delta_at(center.lat));
    match store.query(category, &policy.table, &region).await {
        Ok(rows) => nearest_within(category, policy, center, rows),
        Err(e) => {
            tracing::warn!(
                %category,
                table = %policy.table,
                %center,
                error = %e,
                "amenity query failed; treating as none found"
            );
            Vec::new()
        }
    }
}

/// Exact-distance pass over rows already narrowed by a bounding box.
#[must_use]
pub fn nearest_within(
    category: AmenityCategory,
    policy: &AmenityPolicy,
    center: Coordinate,
    rows: Vec<RawAmenityRow>,
) -> Vec<Amenity> {
    let mut matches: Vec<Amenity> = rows
        .into_iter()
        .filter_map(|row| {
            let coordinate = resolve_coordinate(&row.position)?;
            let distance_m = haversine_m(center, coordinate);
            if distance_m.is_nan() || distance_m > policy.radius_m {
                return None;
            }
            Some(Amenity {
                category,
                name: row.name.unwrap_or_default(),
                coordinate: Some(coordinate),
                distance_m,
            })
        })
        .collect();

    matches.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    matches.truncate(policy.max_results);
    matches
}
