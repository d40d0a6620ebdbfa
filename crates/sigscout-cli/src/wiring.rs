//! Assembly of collectors, synthesizer, and orchestrator from
//! configuration.

use std::sync::Arc;

use sigscout_core::{AppConfig, SourcesFile};
use sigscout_docs::DocsCollector;
use sigscout_market::{MarketCollector, NewsSearchClient, VideoSearchClient};
use sigscout_metrics::endpoints::AnalyticsClient;
use sigscout_metrics::{MetricsCollector, SimulatedMetricsProvider};
use sigscout_report::{Orchestrator, RetryPolicy, Synthesizer, TextGenClient};

/// Build the full pipeline. Absent credentials never fail the build; the
/// matching sub-sources simply run on their fallbacks.
pub fn build_orchestrator(
    config: &AppConfig,
    sources: &SourcesFile,
) -> anyhow::Result<Orchestrator> {
    let timeout = config.request_timeout_secs;
    let ua = &config.user_agent;

    let news = config
        .news_api_key
        .as_deref()
        .map(|key| NewsSearchClient::new(key, timeout, ua))
        .transpose()?;
    let video = config
        .video_api_key
        .as_deref()
        .map(|key| VideoSearchClient::new(key, timeout, ua))
        .transpose()?;
    let market = MarketCollector::new(
        sources.feeds.clone(),
        config.market_max_results,
        news,
        video,
        timeout,
        ua,
    )?;

    let docs = DocsCollector::new(
        sources.scan.clone(),
        config.docs_max_results,
        config.docs_min_document_chars,
    );

    let analytics = config
        .analytics_api_key
        .as_deref()
        .map(|key| AnalyticsClient::new(key, timeout, ua))
        .transpose()?;
    let metrics = MetricsCollector::new(
        Arc::new(SimulatedMetricsProvider),
        sources.metric_endpoints.clone(),
        analytics,
        config.metrics_max_results,
        timeout,
        ua,
    )?;

    let llm = config
        .llm_api_url
        .as_deref()
        .map(|url| {
            TextGenClient::new(url, config.llm_api_key.as_deref(), &config.llm_model, timeout, ua)
        })
        .transpose()?;
    let synthesizer = match &config.template_path {
        Some(path) => Synthesizer::with_template_file(path, llm),
        None => Synthesizer::new(llm),
    };

    let policy = RetryPolicy::new(
        config.collector_max_attempts,
        config.collector_timeout_secs,
        config.retry_backoff_base_ms,
    );

    Ok(Orchestrator::new(
        Arc::new(market),
        Arc::new(docs),
        Arc::new(metrics),
        policy,
        synthesizer,
    ))
}
