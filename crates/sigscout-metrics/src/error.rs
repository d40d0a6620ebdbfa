use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to deserialize {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
