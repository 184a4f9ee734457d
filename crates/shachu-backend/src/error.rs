use thiserror::Error;

/// Errors returned by the backend REST client.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL or a derived endpoint URL is not valid.
    #[error("invalid backend URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
