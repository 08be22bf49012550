//! `TvmazeClient` - TVmaze API client implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::LocalTvmazeApi;
use super::error::TvmazeError;
use super::types::{Episode, SearchResult, Show, ShowWithEmbeds};

/// Default base URL for the TVmaze API.
pub const DEFAULT_BASE_URL: &str = "https://api.tvmaze.com/";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TVmaze API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TvmazeClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests (must end with `/`).
    base_url: Url,
}

/// Builder for `TvmazeClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TvmazeClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl TvmazeClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests, or a mirror).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the per-request timeout (default: 30s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TvmazeClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TvmazeClient {
            http_client,
            base_url,
        })
    }
}

impl TvmazeClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TvmazeClientBuilder {
        TvmazeClientBuilder::new()
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a GET request and decodes the JSON body.
    ///
    /// `path` may already carry a query string; `query` pairs are appended
    /// with form encoding.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let mut builder = self.http_client.get(url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        let request = builder
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(url = %request.url(), "TVmaze API request");

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {path}"))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), path, "TVmaze API returned an error");
            return Err(TvmazeError::Status {
                status: status.as_u16(),
            }
            .into());
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        let parsed =
            raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
        Ok(parsed)
    }
}

impl LocalTvmazeApi for TvmazeClient {
    #[instrument(skip(self))]
    async fn get_shows(&self, page: u32) -> Result<Vec<Show>> {
        let query = [("page", page.to_string())];
        self.get_json("shows", &query).await
    }

    #[instrument(skip_all)]
    async fn search_shows(&self, query: &str) -> Result<Vec<Show>> {
        // Form encoding would turn spaces into '+'; TVmaze expects %20.
        let path = format!("search/shows?q={}", urlencoding::encode(query));
        let results: Vec<SearchResult> = self.get_json(&path, &[]).await?;
        Ok(results.into_iter().map(|result| result.show).collect())
    }

    #[instrument(skip(self))]
    async fn get_show_with_cast(&self, id: u64) -> Result<ShowWithEmbeds> {
        let path = format!("shows/{id}?embed[]=cast&embed[]=episodes");
        self.get_json(&path, &[]).await
    }

    #[instrument(skip(self))]
    async fn get_episodes_by_show_id(&self, id: u64) -> Result<Vec<Episode>> {
        let path = format!("shows/{id}/episodes");
        self.get_json(&path, &[]).await
    }
}
