//! HTTP clients for the news and video search providers.
//!
//! Both wrap `reqwest` with provider-agnostic response shapes and accept a
//! custom base URL so tests can point them at a wiremock server.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::error::MarketError;

const NEWS_DEFAULT_BASE_URL: &str = "https://api.newssearch.example/";
const VIDEO_DEFAULT_BASE_URL: &str = "https://api.videosearch.example/";

/// One article returned by the news search provider.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub source: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    articles: Vec<NewsArticle>,
}

/// One item returned by the video search provider.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoResult {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub channel: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct VideoResponse {
    videos: Vec<VideoResult>,
}

fn build_http(timeout_secs: u64, user_agent: &str) -> Result<Client, MarketError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent.to_owned())
        .build()?)
}

/// Client for the news search provider.
pub struct NewsSearchClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl NewsSearchClient {
    /// Creates a client pointed at the production provider.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Http`] if the HTTP client cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, MarketError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, NEWS_DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, MarketError> {
        Ok(Self {
            client: build_http(timeout_secs, user_agent)?,
            api_key: api_key.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Searches news for the given query string.
    ///
    /// # Errors
    ///
    /// - [`MarketError::Http`] on network failure or non-2xx status.
    /// - [`MarketError::Deserialize`] if the response shape is unexpected.
    pub async fn search(&self, query: &str) -> Result<Vec<NewsArticle>, MarketError> {
        let url = format!("{}/news/search", self.base_url);
        let body = self
            .client
            .get(&url)
            .query(&[("q", query), ("key", &self.api_key)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: NewsResponse =
            serde_json::from_str(&body).map_err(|e| MarketError::Deserialize {
                context: format!("news search(q={query})"),
                source: e,
            })?;
        Ok(response.articles)
    }
}

/// Client for the video search provider.
pub struct VideoSearchClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl VideoSearchClient {
    /// Creates a client pointed at the production provider.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Http`] if the HTTP client cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, MarketError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, VIDEO_DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, MarketError> {
        Ok(Self {
            client: build_http(timeout_secs, user_agent)?,
            api_key: api_key.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Searches videos for the given query string.
    ///
    /// # Errors
    ///
    /// - [`MarketError::Http`] on network failure or non-2xx status.
    /// - [`MarketError::Deserialize`] if the response shape is unexpected.
    pub async fn search(&self, query: &str) -> Result<Vec<VideoResult>, MarketError> {
        let url = format!("{}/video/search", self.base_url);
        let body = self
            .client
            .get(&url)
            .query(&[("q", query), ("key", &self.api_key)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: VideoResponse =
            serde_json::from_str(&body).map_err(|e| MarketError::Deserialize {
                context: format!("video search(q={query})"),
                source: e,
            })?;
        Ok(response.videos)
    }
}
