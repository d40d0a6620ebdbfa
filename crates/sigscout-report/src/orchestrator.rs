//! Orchestration of one scouting run: fan out the three collectors with
//! retry and timeout, settle all of them, and assemble the report.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use sigscout_core::{Collector, CollectorResult, OrchestrationReport, TopicQuery};

use crate::error::OrchestrateError;
use crate::retry::{with_retry_and_timeout, RetryPolicy};
use crate::synthesis::Synthesizer;

/// Runs the three collectors concurrently and aggregates their settled
/// outcomes. Any subset of collectors may fail; only an empty topic is a
/// hard error.
pub struct Orchestrator {
    market: Arc<dyn Collector>,
    docs: Arc<dyn Collector>,
    metrics: Arc<dyn Collector>,
    policy: RetryPolicy,
    synthesizer: Synthesizer,
}

impl Orchestrator {
    #[must_use]
    pub fn new(
        market: Arc<dyn Collector>,
        docs: Arc<dyn Collector>,
        metrics: Arc<dyn Collector>,
        policy: RetryPolicy,
        synthesizer: Synthesizer,
    ) -> Self {
        Self {
            market,
            docs,
            metrics,
            policy,
            synthesizer,
        }
    }

    /// Execute one run.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrateError::EmptyTopic`] when the topic trims to
    /// nothing. Collector failures never error; they settle into `Failed`
    /// slots in the report.
    pub async fn run(
        &self,
        topic: &str,
        focus: Option<&str>,
    ) -> Result<OrchestrationReport, OrchestrateError> {
        let query = TopicQuery::new(topic, focus).ok_or(OrchestrateError::EmptyTopic)?;
        let run_id = Uuid::new_v4();
        let started = Instant::now();
        tracing::info!(%run_id, topic = query.topic(), focus = query.focus(), "run started");

        let market_task = tokio::spawn(run_collector(
            Arc::clone(&self.market),
            query.clone(),
            self.policy.clone(),
        ));
        let docs_task = tokio::spawn(run_collector(
            Arc::clone(&self.docs),
            query.clone(),
            self.policy.clone(),
        ));
        let metrics_task = tokio::spawn(run_collector(
            Arc::clone(&self.metrics),
            query.clone(),
            self.policy.clone(),
        ));

        // Settle all three; a panicked task becomes a Failed slot.
        let (market, docs, metrics) = tokio::join!(market_task, docs_task, metrics_task);
        let market = settle(market, self.market.kind());
        let docs = settle(docs, self.docs.kind());
        let metrics = settle(metrics, self.metrics.kind());

        let results = [&market, &docs, &metrics];
        let total_signal_count: usize = results.iter().map(|r| r.item_count()).sum();
        let successful_collector_count = results.iter().filter(|r| r.is_success()).count();
        let execution_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let synthesis = self
            .synthesizer
            .synthesize(query.topic(), query.focus(), results, execution_time_ms)
            .await;

        tracing::info!(
            %run_id,
            total_signal_count,
            successful_collector_count,
            execution_time_ms,
            "run complete"
        );

        Ok(OrchestrationReport {
            run_id,
            topic: query.topic().to_string(),
            focus: query.focus().map(ToString::to_string),
            generated_at: Utc::now(),
            market,
            docs,
            metrics,
            total_signal_count,
            successful_collector_count,
            execution_time_ms,
            synthesis,
        })
    }
}

/// One collector invocation under the retry policy, timed wall-clock.
async fn run_collector(
    collector: Arc<dyn Collector>,
    query: TopicQuery,
    policy: RetryPolicy,
) -> CollectorResult {
    let kind = collector.kind();
    let started = Instant::now();

    let outcome = with_retry_and_timeout(&policy, &kind.to_string(), || {
        let collector = Arc::clone(&collector);
        let query = query.clone();
        async move { collector.collect(&query).await }
    })
    .await;

    let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    match outcome {
        Ok(collected) => {
            CollectorResult::success(kind, collected.signals, collected.note, elapsed)
        }
        Err(e) => {
            tracing::error!(collector = %kind, error = %e, "collector failed after retries");
            CollectorResult::failure(kind, e.to_string(), elapsed)
        }
    }
}

fn settle(
    joined: Result<CollectorResult, tokio::task::JoinError>,
    kind: sigscout_core::CollectorKind,
) -> CollectorResult {
    match joined {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(collector = %kind, error = %e, "collector task panicked");
            CollectorResult::failure(kind, format!("collector task panicked: {e}"), 0)
        }
    }
}
