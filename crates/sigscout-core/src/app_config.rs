use std::path::PathBuf;

/// Application configuration, resolved from environment variables.
///
/// Every provider credential is optional: an absent key switches the
/// corresponding sub-source to its simulated fallback, it never fails the
/// run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Path to the sources file; a missing file falls back to built-in
    /// defaults at load time.
    pub sources_path: PathBuf,

    /// News search provider credential; `None` → simulated articles.
    pub news_api_key: Option<String>,
    /// Video search provider credential; `None` → simulated videos.
    pub video_api_key: Option<String>,
    /// Analytics platform credential; `None` → simulated metrics only.
    pub analytics_api_key: Option<String>,

    /// Text-generation endpoint; `None` → no synthesis call attempted.
    pub llm_api_url: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_model: String,

    /// Per-request HTTP timeout for sub-source fetches.
    pub request_timeout_secs: u64,
    pub user_agent: String,

    /// Retry policy applied per collector by the orchestrator.
    pub collector_max_attempts: u32,
    pub collector_timeout_secs: u64,
    pub retry_backoff_base_ms: u64,

    /// Ranked-list caps per collector.
    pub market_max_results: usize,
    pub docs_max_results: usize,
    pub metrics_max_results: usize,

    /// Docs prefilter: minimum document length in chars.
    pub docs_min_document_chars: usize,
    /// Optional report template file for the synthesizer.
    pub template_path: Option<PathBuf>,
}
