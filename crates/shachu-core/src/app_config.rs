use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub backend_url: String,
    pub backend_api_key: String,
    pub env: Environment,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Name of the fee-aware ranking procedure exposed by the backend.
    pub ranking_rpc: String,
    /// Optional YAML override for radii, caps and result limits.
    pub policy_path: Option<PathBuf>,
    pub spots_path: PathBuf,
    /// Pause between consecutive centers in batch runs.
    pub inter_run_delay_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("backend_url", &self.backend_url)
            .field("backend_api_key", &"[redacted]")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("ranking_rpc", &self.ranking_rpc)
            .field("policy_path", &self.policy_path)
            .field("spots_path", &self.spots_path)
            .field("inter_run_delay_ms", &self.inter_run_delay_ms)
            .finish()
    }
}
