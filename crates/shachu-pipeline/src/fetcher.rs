use shachu_backend::{CandidateSource, RawCandidate};
use shachu_core::{OvernightWindow, SearchRegion};

/// Asks the ranking procedure for candidates in `region` during `window`.
///
/// Rows come back in the backend's fee order and are passed through untouched.
/// A failed call is logged and yields an empty list.
pub async fn fetch_candidates<S: CandidateSource>(
    source: &S,
    region: &SearchRegion,
    window: &OvernightWindow,
) -> Vec<RawCandidate> {
    match source.rank(region, window).await {
        Ok(rows) => {
            tracing::debug!(count = rows.len(), "ranking procedure returned candidates");
            rows
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                start = %window.start_time.to_rfc3339(),
                duration_minutes = window.duration_minutes,
                "candidate ranking failed; continuing with no candidates"
            );
            Vec::new()
        }
    }
}
