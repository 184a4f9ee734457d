//! Enrichment orchestrator.
//!
//! Every candidate is enriched independently: distance and walking time to
//! the search center, plus one nearest amenity per category measured from the
//! candidate itself. Work fans out with `join_all` and is joined positionally,
//! so output order always matches input order.

use std::collections::BTreeMap;

use futures::future::join_all;

use shachu_backend::{AmenityStore, RawCandidate};
use shachu_core::{
    haversine_m, walking_minutes, Amenity, AmenityCategory, Coordinate, ParkingCandidate,
    SearchPolicy,
};

use crate::matcher::find_nearest;
use crate::normalize::{merge_amenity, normalize, NormalizedCandidate};

/// Enriches backend candidates around `center`.
///
/// Candidates without a usable coordinate are dropped; everything else is
/// kept in the order given. Amenity lookups that fail surface as `None`.
pub async fn enrich<A: AmenityStore>(
    store: &A,
    policy: &SearchPolicy,
    raw: Vec<RawCandidate>,
    center: Coordinate,
) -> Vec<ParkingCandidate> {
    let received = raw.len();
    let normalized: Vec<NormalizedCandidate> = raw
        .into_iter()
        .filter_map(|candidate| normalize(candidate, policy))
        .collect();

    if normalized.len() < received {
        tracing::info!(
            received,
            kept = normalized.len(),
            "dropped candidates without usable coordinates"
        );
    }

    join_all(
        normalized
            .into_iter()
            .map(|candidate| enrich_one(store, policy, candidate, center)),
    )
    .await
}

async fn enrich_one<A: AmenityStore>(
    store: &A,
    policy: &SearchPolicy,
    candidate: NormalizedCandidate,
    center: Coordinate,
) -> ParkingCandidate {
    let NormalizedCandidate {
        id,
        name,
        coordinate,
        raw_fee_rules,
        calculated_fee,
        mut hints,
    } = candidate;

    let lookups = AmenityCategory::ALL.into_iter().map(|category| {
        let hint = hints.remove(&category);
        async move {
            let matched = if hint.is_some() {
                None
            } else {
                nearest(store, policy, category, coordinate).await
            };
            (category, merge_amenity(hint, matched))
        }
    });
    let nearest_amenities: BTreeMap<AmenityCategory, Option<Amenity>> =
        join_all(lookups).await.into_iter().collect();

    let distance_to_center_m = haversine_m(center, coordinate);

    ParkingCandidate {
        id,
        name,
        coordinate,
        raw_fee_rules,
        calculated_fee,
        distance_to_center_m,
        walking_minutes: walking_minutes(distance_to_center_m),
        nearest_amenities,
    }
}

async fn nearest<A: AmenityStore>(
    store: &A,
    policy: &SearchPolicy,
    category: AmenityCategory,
    at: Coordinate,
) -> Option<Amenity> {
    find_nearest(store, category, policy.amenity(category), at)
        .await
        .into_iter()
        .next()
}

#[cfg(test)]
#[path = "enrich_test.rs"]
mod tests;
