use shachu_backend::{AmenityStore, CandidateSource};
use shachu_core::{Coordinate, OvernightWindow};
use shachu_pipeline::Pipeline;

/// Runs one search and prints the result set as JSON.
///
/// An empty result prints `[]`; it is not an error.
pub(crate) async fn run_search<C, A>(
    pipeline: &Pipeline<C, A>,
    lat: f64,
    lng: f64,
    window: &OvernightWindow,
) -> anyhow::Result<()>
where
    C: CandidateSource,
    A: AmenityStore,
{
    let center = Coordinate::new(lat, lng)?;
    let ranked = pipeline.run(center, window).await;
    if ranked.is_empty() {
        tracing::info!(%center, "no parking candidates near center");
    }
    println!("{}", serde_json::to_string_pretty(&ranked)?);
    Ok(())
}
