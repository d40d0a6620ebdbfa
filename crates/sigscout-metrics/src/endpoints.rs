//! HTTP sources of custom metrics: user-configured endpoints and the
//! optional analytics platform.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::MetricsError;

const ANALYTICS_DEFAULT_BASE_URL: &str = "https://api.analytics.example/";

/// One current-value metric returned by a custom endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointMetric {
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Client for user-configured metric endpoints. Endpoints are plain GET
/// URLs returning a JSON array of `{name, value, unit?}` objects.
pub struct EndpointClient {
    client: Client,
}

impl EndpointClient {
    /// # Errors
    ///
    /// Returns [`MetricsError::Http`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, MetricsError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .connect_timeout(Duration::from_secs(10))
                .user_agent(user_agent.to_owned())
                .build()?,
        })
    }

    /// Fetches metrics from one configured endpoint URL.
    ///
    /// # Errors
    ///
    /// - [`MetricsError::Http`] on network failure or non-2xx status.
    /// - [`MetricsError::Deserialize`] if the response shape is unexpected.
    pub async fn fetch(&self, url: &str) -> Result<Vec<EndpointMetric>, MetricsError> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        serde_json::from_str(&body).map_err(|e| MetricsError::Deserialize {
            context: format!("custom endpoint {url}"),
            source: e,
        })
    }
}

/// One metric returned by the analytics platform.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsMetric {
    pub name: String,
    pub category: String,
    pub value: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnalyticsResponse {
    metrics: Vec<AnalyticsMetric>,
}

/// Client for the analytics platform, consulted when its API key is set.
pub struct AnalyticsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnalyticsClient {
    /// Creates a client pointed at the production platform.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Http`] if the HTTP client cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, MetricsError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, ANALYTICS_DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, MetricsError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .connect_timeout(Duration::from_secs(10))
                .user_agent(user_agent.to_owned())
                .build()?,
            api_key: api_key.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Fetches topic-scoped metrics from the platform.
    ///
    /// # Errors
    ///
    /// - [`MetricsError::Http`] on network failure or non-2xx status.
    /// - [`MetricsError::Deserialize`] if the response shape is unexpected.
    pub async fn fetch(&self, query: &str) -> Result<Vec<AnalyticsMetric>, MetricsError> {
        let url = format!("{}/v1/metrics", self.base_url);
        let body = self
            .client
            .get(&url)
            .query(&[("q", query), ("key", &self.api_key)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: AnalyticsResponse =
            serde_json::from_str(&body).map_err(|e| MetricsError::Deserialize {
                context: format!("analytics metrics(q={query})"),
                source: e,
            })?;
        Ok(response.metrics)
    }
}
