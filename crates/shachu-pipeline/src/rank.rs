use shachu_core::{ParkingCandidate, RankedResultSet};

/// Applies the final distance cutoff and top-N cap.
///
/// Backend fee order is kept as-is. A violation of the fee-order invariant is
/// logged, never corrected by re-sorting.
#[must_use]
pub fn finalize(
    enriched: Vec<ParkingCandidate>,
    max_distance_m: f64,
    top_n: usize,
) -> RankedResultSet {
    let ranked = RankedResultSet::new(
        enriched
            .into_iter()
            .filter(|c| c.distance_to_center_m <= max_distance_m)
            .take(top_n)
            .collect(),
    );

    if !ranked.is_fee_ordered() {
        tracing::warn!(
            count = ranked.len(),
            "ranking procedure returned candidates out of fee order; keeping backend order"
        );
    }

    ranked
}
