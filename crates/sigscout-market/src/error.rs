use thiserror::Error;

/// Errors from market sub-source fetching and parsing.
#[derive(Debug, Error)]
pub enum MarketError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed feed XML.
    #[error("feed parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The search provider response did not match the expected shape.
    #[error("deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
