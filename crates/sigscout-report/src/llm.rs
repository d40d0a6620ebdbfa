//! Client for the optional text-generation service.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct UsageBody {
    #[serde(default)]
    prompt_tokens: Option<u64>,
    #[serde(default)]
    completion_tokens: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    text: String,
    model: String,
    #[serde(default)]
    usage: Option<UsageBody>,
}

/// Text produced by one generation call.
#[derive(Debug, Clone)]
pub struct GeneratedText {
    pub text: String,
    pub model: String,
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
}

/// Client for the text-generation endpoint. Constructed only when the
/// endpoint URL is configured; a missing key is allowed for self-hosted
/// deployments.
pub struct TextGenClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl TextGenClient {
    /// # Errors
    ///
    /// Returns [`ReportError::Http`] if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        model: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ReportError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .connect_timeout(Duration::from_secs(10))
                .user_agent(user_agent.to_owned())
                .build()?,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.map(ToOwned::to_owned),
            model: model.to_owned(),
        })
    }

    /// Sends one generation request.
    ///
    /// # Errors
    ///
    /// - [`ReportError::Http`] on network failure or non-2xx status.
    /// - [`ReportError::Deserialize`] if the response shape is unexpected.
    pub async fn generate(&self, system: &str, prompt: &str) -> Result<GeneratedText, ReportError> {
        let url = format!("{}/v1/generate", self.base_url);
        let mut request = self.client.post(&url).json(&GenerateRequest {
            model: &self.model,
            system,
            prompt,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let body = request
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| ReportError::Deserialize {
                context: format!("generate(model={})", self.model),
                source: e,
            })?;

        let usage = response.usage.unwrap_or(UsageBody {
            prompt_tokens: None,
            completion_tokens: None,
        });
        Ok(GeneratedText {
            text: response.text,
            model: response.model,
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
        })
    }
}
