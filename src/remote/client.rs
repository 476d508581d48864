//! Async client for the paginated metrics API
//!
//! Downloads every page of a dataset by following the server's `next`
//! pointer. Errors are surfaced as-is: no retries, no backoff.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use super::frame::{MetricFrame, PageCollector};
use super::query::{FetchOptions, MetricQuery};
use super::FetchError;

pub const DEFAULT_BASE_URL: &str = "https://api.ukhsa-dashboard.data.gov.uk";
pub const DEFAULT_API_VERSION: &str = "v2";
pub const SUPPORTED_API_VERSIONS: &[&str] = &["v2"];

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for fetching comparison datasets
pub struct MetricClient {
    client: Client,
    base_url: String,
    api_version: String,
}

impl MetricClient {
    /// Create a client against an explicit base URL and API version
    ///
    /// The version is checked when a query is fetched, not here.
    pub fn new(base_url: String, api_version: String) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(client, base_url, api_version))
    }

    /// Use a preconfigured HTTP client (proxies, headers, timeouts)
    pub fn with_client(client: Client, base_url: String, api_version: String) -> Self {
        Self {
            client,
            base_url,
            api_version,
        }
    }

    /// Create a client from environment variables
    ///
    /// Optional: METRICS_API_URL (defaults to the public dashboard API)
    /// Optional: METRICS_API_VERSION (defaults to v2)
    pub fn from_env() -> Result<Self, FetchError> {
        let base_url =
            std::env::var("METRICS_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let api_version =
            std::env::var("METRICS_API_VERSION").unwrap_or_else(|_| DEFAULT_API_VERSION.into());
        Self::new(base_url, api_version)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Fetch the full dataset identified by `query`
    pub async fn fetch_metric(
        &self,
        query: &MetricQuery,
        options: &FetchOptions,
    ) -> Result<MetricFrame, FetchError> {
        if !SUPPORTED_API_VERSIONS.contains(&self.api_version.as_str()) {
            return Err(FetchError::UnsupportedApiVersion(self.api_version.clone()));
        }

        let url = query.url(&self.base_url, &self.api_version);
        self.fetch_metric_by_url(&url, options).await
    }

    /// Fetch every page starting at `url`
    ///
    /// Filters and page size go on the first request only; later requests
    /// use the server-provided `next` URL verbatim.
    pub async fn fetch_metric_by_url(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> Result<MetricFrame, FetchError> {
        let params = options.query_params();
        let mut pages = PageCollector::new();
        let mut next_url = Some(url.to_string());

        while let Some(page_url) = next_url {
            let page_params: &[(String, String)] = if pages.pages() == 0 {
                &params
            } else {
                &[]
            };
            let payload = self.get_json(&page_url, page_params).await?;
            next_url = pages.absorb(&page_url, payload)?;

            tracing::info!(page = pages.pages(), url = %page_url, "Fetched page");
        }

        pages.finish()
    }

    async fn get_json(&self, url: &str, params: &[(String, String)]) -> Result<Value, FetchError> {
        let mut request = self.client.get(url);
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}
