use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let backend_url = require("SHACHU_BACKEND_URL")?;
    if !(backend_url.starts_with("http://") || backend_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHACHU_BACKEND_URL".to_string(),
            reason: format!("expected an http(s) URL, got '{backend_url}'"),
        });
    }
    let backend_api_key = require("SHACHU_BACKEND_API_KEY")?;

    let env = parse_environment(&or_default("SHACHU_ENV", "development"))?;
    let log_level = or_default("SHACHU_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("SHACHU_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SHACHU_USER_AGENT", "shachu/0.1 (overnight-parking)");
    let ranking_rpc = or_default("SHACHU_RANKING_RPC", "get_parking_spots_sorted_by_fee");
    let policy_path = lookup("SHACHU_POLICY_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let spots_path = PathBuf::from(or_default("SHACHU_SPOTS_PATH", "./config/spots.yaml"));
    let inter_run_delay_ms = parse_u64("SHACHU_INTER_RUN_DELAY_MS", "200")?;

    Ok(AppConfig {
        backend_url,
        backend_api_key,
        env,
        log_level,
        request_timeout_secs,
        user_agent,
        ranking_rpc,
        policy_path,
        spots_path,
        inter_run_delay_ms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SHACHU_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
