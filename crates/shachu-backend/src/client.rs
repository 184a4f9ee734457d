//! HTTP client for the hosted PostgREST-style backend.
//!
//! Two endpoints are used: the fee-aware ranking procedure
//! (`POST rest/v1/rpc/{name}`) and the per-category amenity tables
//! (`GET rest/v1/{table}` with bounding-box filters). Rows that fail to
//! deserialize are skipped individually so one odd row never hides the rest.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use shachu_core::{AmenityCategory, AppConfig, OvernightWindow, SearchRegion};

use crate::error::BackendError;
use crate::source::{AmenityStore, CandidateSource};
use crate::types::{RankRequest, RawAmenityRow, RawCandidate};

/// Client for the backend REST API.
///
/// Use [`BackendClient::from_config`] in binaries or [`BackendClient::new`]
/// to point at a mock server in tests.
pub struct BackendClient {
    client: Client,
    api_key: String,
    base_url: Url,
    ranking_rpc: String,
}

impl BackendClient {
    /// Creates a client with an explicit base URL, key and ranking procedure.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`BackendError::InvalidUrl`] if `base_url`
    /// does not parse.
    pub fn new(
        base_url: &str,
        api_key: &str,
        ranking_rpc: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so relative joins append to the path
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| BackendError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            ranking_rpc: ranking_rpc.to_owned(),
        })
    }

    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// See [`BackendClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, BackendError> {
        Self::new(
            &config.backend_url,
            &config.backend_api_key,
            &config.ranking_rpc,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Calls the ranking procedure for `region` and `window`.
    ///
    /// # Errors
    ///
    /// - [`BackendError::Http`] on network failure or timeout.
    /// - [`BackendError::UnexpectedStatus`] on a non-2xx response.
    /// - [`BackendError::Deserialize`] if the body is not a JSON array.
    pub async fn rank_candidates(
        &self,
        region: &SearchRegion,
        window: &OvernightWindow,
    ) -> Result<Vec<RawCandidate>, BackendError> {
        let url = self.rpc_url()?;
        let body = RankRequest::new(region, window);
        let request = self.authorized(self.client.post(url.clone())).json(&body);
        let rows = Self::send_rows(request, &url).await?;
        Ok(parse_rows(rows, &self.ranking_rpc))
    }

    /// Fetches every row of `table` inside `region`.
    ///
    /// # Errors
    ///
    /// Same as [`BackendClient::rank_candidates`].
    pub async fn query_amenity_table(
        &self,
        table: &str,
        region: &SearchRegion,
    ) -> Result<Vec<RawAmenityRow>, BackendError> {
        let url = self.table_url(table, region)?;
        let request = self.authorized(self.client.get(url.clone()));
        let rows = Self::send_rows(request, &url).await?;
        Ok(parse_rows(rows, table))
    }

    fn rpc_url(&self) -> Result<Url, BackendError> {
        self.join(&format!("rest/v1/rpc/{}", self.ranking_rpc))
    }

    /// Builds the table URL with bounding-box filters in PostgREST syntax.
    fn table_url(&self, table: &str, region: &SearchRegion) -> Result<Url, BackendError> {
        let mut url = self.join(&format!("rest/v1/{table}"))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", "*");
            pairs.append_pair("lat", &format!("gte.{}", region.min_lat));
            pairs.append_pair("lat", &format!("lte.{}", region.max_lat));
            pairs.append_pair("lng", &format!("gte.{}", region.min_lng));
            pairs.append_pair("lng", &format!("lte.{}", region.max_lng));
        }
        Ok(url)
    }

    fn join(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Sends the request, asserts a 2xx status, and parses a JSON array body.
    async fn send_rows(
        request: RequestBuilder,
        url: &Url,
    ) -> Result<Vec<serde_json::Value>, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::UnexpectedStatus {
                status: status.as_u16(),
                url: redact(url),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| BackendError::Deserialize {
            context: redact(url),
            source: e,
        })
    }
}

impl CandidateSource for BackendClient {
    async fn rank(
        &self,
        region: &SearchRegion,
        window: &OvernightWindow,
    ) -> Result<Vec<RawCandidate>, BackendError> {
        self.rank_candidates(region, window).await
    }
}

impl AmenityStore for BackendClient {
    async fn query(
        &self,
        _category: AmenityCategory,
        table: &str,
        region: &SearchRegion,
    ) -> Result<Vec<RawAmenityRow>, BackendError> {
        self.query_amenity_table(table, region).await
    }
}

/// Deserializes each row on its own, logging and skipping failures.
fn parse_rows<T: DeserializeOwned>(rows: Vec<serde_json::Value>, context: &str) -> Vec<T> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(idx, row)| match serde_json::from_value::<T>(row) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(context, row = idx, error = %e, "skipping malformed backend row");
                None
            }
        })
        .collect()
}

/// URL without its query string, for error messages.
fn redact(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.to_string()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
