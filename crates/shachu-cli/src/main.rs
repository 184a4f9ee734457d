mod batch;
mod search;
mod window;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shachu_backend::BackendClient;
use shachu_core::{load_policy, load_spots, AppConfig, OvernightWindow, SearchPolicy};
use shachu_pipeline::Pipeline;

use crate::window::DEFAULT_DURATION_MINUTES;

#[derive(Debug, Parser)]
#[command(name = "shachu")]
#[command(about = "Find cheap overnight parking with nearby amenities")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search around a single center coordinate
    Search {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lng: f64,

        #[command(flatten)]
        window: WindowArgs,
    },
    /// Search around every spot in the spots file, one after another
    Batch {
        /// Spots YAML file (defaults to SHACHU_SPOTS_PATH)
        #[arg(long)]
        spots: Option<PathBuf>,

        #[command(flatten)]
        window: WindowArgs,
    },
}

#[derive(Debug, Args)]
struct WindowArgs {
    /// Entry time as RFC 3339 (defaults to the next 18:00 JST)
    #[arg(long)]
    start: Option<String>,

    /// Length of the stay in minutes
    #[arg(long, default_value_t = DEFAULT_DURATION_MINUTES)]
    duration_minutes: u32,
}

impl WindowArgs {
    fn resolve(&self) -> anyhow::Result<OvernightWindow> {
        window::resolve_window(self.start.as_deref(), self.duration_minutes, Utc::now())
    }
}

fn load_search_policy(config: &AppConfig) -> anyhow::Result<SearchPolicy> {
    match &config.policy_path {
        Some(path) => load_policy(path)
            .with_context(|| format!("failed to load search policy from {}", path.display())),
        None => Ok(SearchPolicy::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = shachu_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, "configuration loaded");

    let policy = load_search_policy(&config)?;
    let client = BackendClient::from_config(&config)?;
    let pipeline = Pipeline::new(&client, &client, policy);

    match cli.command {
        Commands::Search { lat, lng, window } => {
            search::run_search(&pipeline, lat, lng, &window.resolve()?).await?;
        }
        Commands::Batch { spots, window } => {
            let window = window.resolve()?;
            let path = spots.unwrap_or_else(|| config.spots_path.clone());
            let spots_file = load_spots(&path)
                .with_context(|| format!("failed to load spots from {}", path.display()))?;
            let results = batch::run_batch(
                &pipeline,
                &spots_file.spots,
                &window,
                Duration::from_millis(config.inter_run_delay_ms),
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    Ok(())
}
