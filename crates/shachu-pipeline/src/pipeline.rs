use shachu_backend::{AmenityStore, CandidateSource};
use shachu_core::{Coordinate, OvernightWindow, RankedResultSet, SearchPolicy, SearchRegion};

use crate::enrich::enrich;
use crate::fetcher::fetch_candidates;
use crate::rank::finalize;

/// Region → fetch → enrich → finalize, over injected collaborators.
///
/// Holds no mutable state; one instance serves any number of sequential or
/// concurrent runs.
#[derive(Debug, Clone)]
pub struct Pipeline<C, A> {
    source: C,
    store: A,
    policy: SearchPolicy,
}

impl<C, A> Pipeline<C, A>
where
    C: CandidateSource,
    A: AmenityStore,
{
    #[must_use]
    pub fn new(source: C, store: A, policy: SearchPolicy) -> Self {
        Self {
            source,
            store,
            policy,
        }
    }

    #[must_use]
    pub fn policy(&self) -> &SearchPolicy {
        &self.policy
    }

    /// Runs one search around `center`.
    ///
    /// Backend outages and malformed rows degrade to fewer or no results; an
    /// empty set is a valid outcome, not an error.
    pub async fn run(&self, center: Coordinate, window: &OvernightWindow) -> RankedResultSet {
        let region = SearchRegion::around(center, self.policy.parking_delta_deg);
        let raw = fetch_candidates(&self.source, &region, window).await;
        let fetched = raw.len();

        let enriched = enrich(&self.store, &self.policy, raw, center).await;
        let ranked = finalize(enriched, self.policy.max_distance_m, self.policy.top_n);

        tracing::info!(
            %center,
            fetched,
            returned = ranked.len(),
            "search complete"
        );
        ranked
    }
}
