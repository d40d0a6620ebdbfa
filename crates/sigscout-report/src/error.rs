use thiserror::Error;

/// Errors from the text-generation client.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to deserialize {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Hard validation failures from the orchestrator. Everything else a run
/// can encounter degrades into the report instead of erroring.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrchestrateError {
    #[error("topic must be non-empty")]
    EmptyTopic,
}
