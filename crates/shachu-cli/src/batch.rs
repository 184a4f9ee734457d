//! Sequential runs over the configured spot list.

use std::collections::BTreeMap;
use std::time::Duration;

use shachu_backend::{AmenityStore, CandidateSource};
use shachu_core::{OvernightWindow, RankedResultSet, SpotConfig};
use shachu_pipeline::Pipeline;

/// Runs the pipeline for every spot in order, sleeping `delay` between runs.
///
/// Spots with no candidates are logged and left out of the returned map.
///
/// # Errors
///
/// Returns an error only if a spot carries an invalid coordinate.
pub(crate) async fn run_batch<C, A>(
    pipeline: &Pipeline<C, A>,
    spots: &[SpotConfig],
    window: &OvernightWindow,
    delay: Duration,
) -> anyhow::Result<BTreeMap<String, RankedResultSet>>
where
    C: CandidateSource,
    A: AmenityStore,
{
    let mut results = BTreeMap::new();
    let mut skipped = 0_usize;

    for (index, spot) in spots.iter().enumerate() {
        if index > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let center = spot.center()?;
        let ranked = pipeline.run(center, window).await;
        if ranked.is_empty() {
            tracing::info!(
                spot = %spot.name,
                notes = spot.notes.as_deref().unwrap_or("-"),
                "no parking candidates; skipping spot"
            );
            skipped += 1;
            continue;
        }

        tracing::info!(spot = %spot.name, count = ranked.len(), "spot complete");
        results.insert(spot.name.trim().to_string(), ranked);
    }

    tracing::info!(
        spots = spots.len(),
        rendered = results.len(),
        skipped,
        "batch complete"
    );
    Ok(results)
}
