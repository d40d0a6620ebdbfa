//! Integration tests for the orchestrator: partial failure, retries,
//! timeouts, panic containment, and the empty-topic guard.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use sigscout_core::{
    Collected, Collector, CollectorKind, CollectorStatus, Signal, SignalKind, TopicQuery,
};
use sigscout_report::{OrchestrateError, Orchestrator, RetryPolicy, Synthesizer, TextGenClient};

fn sample_signal(label: &str) -> Signal {
    Signal {
        kind: SignalKind::NewsArticle,
        title: Some("headline".to_string()),
        content: "a reasonably long piece of content about the topic".to_string(),
        source_label: label.to_string(),
        published_at: None,
        relevance_score: 0.5,
        combined_score: 0.5,
        metadata: serde_json::Map::new(),
    }
}

struct OkCollector {
    kind: CollectorKind,
    count: usize,
    calls: Arc<AtomicU32>,
}

#[async_trait]
impl Collector for OkCollector {
    fn kind(&self) -> CollectorKind {
        self.kind
    }

    async fn collect(&self, _query: &TopicQuery) -> anyhow::Result<Collected> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Collected::new(
            (0..self.count).map(|_| sample_signal("stub")).collect(),
        ))
    }
}

struct FailingCollector {
    kind: CollectorKind,
    calls: Arc<AtomicU32>,
}

#[async_trait]
impl Collector for FailingCollector {
    fn kind(&self) -> CollectorKind {
        self.kind
    }

    async fn collect(&self, _query: &TopicQuery) -> anyhow::Result<Collected> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        anyhow::bail!("provider unreachable")
    }
}

/// Fails the first call, succeeds afterwards.
struct FlakyCollector {
    kind: CollectorKind,
    calls: Arc<AtomicU32>,
}

#[async_trait]
impl Collector for FlakyCollector {
    fn kind(&self) -> CollectorKind {
        self.kind
    }

    async fn collect(&self, _query: &TopicQuery) -> anyhow::Result<Collected> {
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt == 1 {
            anyhow::bail!("transient failure")
        }
        Ok(Collected::new(vec![sample_signal("flaky")]))
    }
}

struct SlowCollector {
    kind: CollectorKind,
}

#[async_trait]
impl Collector for SlowCollector {
    fn kind(&self) -> CollectorKind {
        self.kind
    }

    async fn collect(&self, _query: &TopicQuery) -> anyhow::Result<Collected> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Collected::new(vec![sample_signal("slow")]))
    }
}

struct PanickingCollector {
    kind: CollectorKind,
}

#[async_trait]
impl Collector for PanickingCollector {
    fn kind(&self) -> CollectorKind {
        self.kind
    }

    async fn collect(&self, _query: &TopicQuery) -> anyhow::Result<Collected> {
        panic!("collector bug")
    }
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 2,
        attempt_timeout: Duration::from_millis(200),
        backoff_base: Duration::ZERO,
    }
}

fn counter() -> Arc<AtomicU32> {
    Arc::new(AtomicU32::new(0))
}

fn ok(kind: CollectorKind, count: usize, calls: &Arc<AtomicU32>) -> Arc<dyn Collector> {
    Arc::new(OkCollector {
        kind,
        count,
        calls: Arc::clone(calls),
    })
}

#[tokio::test]
async fn all_successful_collectors_fill_all_slots() {
    let calls = counter();
    let orchestrator = Orchestrator::new(
        ok(CollectorKind::Market, 2, &calls),
        ok(CollectorKind::Docs, 1, &calls),
        ok(CollectorKind::Metrics, 3, &calls),
        fast_policy(),
        Synthesizer::new(None),
    );

    let report = orchestrator.run("checkout flow", None).await.unwrap();
    assert_eq!(report.successful_collector_count, 3);
    assert_eq!(report.total_signal_count, 6);
    assert_eq!(report.market.signals.len(), 2);
    assert_eq!(report.docs.signals.len(), 1);
    assert_eq!(report.metrics.signals.len(), 3);
    assert_eq!(report.topic, "checkout flow");
    assert!((report.synthesis.summary.coverage_percent - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn one_failed_collector_degrades_not_errors() {
    let calls = counter();
    let fail_calls = counter();
    let orchestrator = Orchestrator::new(
        ok(CollectorKind::Market, 4, &calls),
        Arc::new(FailingCollector {
            kind: CollectorKind::Docs,
            calls: Arc::clone(&fail_calls),
        }),
        ok(CollectorKind::Metrics, 2, &calls),
        fast_policy(),
        Synthesizer::new(None),
    );

    let report = orchestrator.run("checkout flow", None).await.unwrap();
    assert_eq!(report.successful_collector_count, 2);
    assert_eq!(report.total_signal_count, 6, "failed slot contributes zero");
    assert_eq!(report.docs.status, CollectorStatus::Failed);
    assert!(report.docs.signals.is_empty());
    assert!(report
        .docs
        .error
        .as_deref()
        .is_some_and(|e| e.contains("provider unreachable")));
    // Both attempts were spent before the slot settled as Failed.
    assert_eq!(fail_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn all_collectors_failing_is_still_a_report() {
    let a = counter();
    let b = counter();
    let c = counter();
    let orchestrator = Orchestrator::new(
        Arc::new(FailingCollector {
            kind: CollectorKind::Market,
            calls: a,
        }),
        Arc::new(FailingCollector {
            kind: CollectorKind::Docs,
            calls: b,
        }),
        Arc::new(FailingCollector {
            kind: CollectorKind::Metrics,
            calls: c,
        }),
        fast_policy(),
        Synthesizer::new(None),
    );

    let report = orchestrator.run("checkout flow", None).await.unwrap();
    assert_eq!(report.successful_collector_count, 0);
    assert_eq!(report.total_signal_count, 0);
    assert!(report.synthesis.cross_references.is_empty());
    assert_eq!(report.synthesis.summary.coverage_percent, 0.0);
}

#[tokio::test]
async fn empty_topic_fails_before_any_collector_runs() {
    let calls = counter();
    let orchestrator = Orchestrator::new(
        ok(CollectorKind::Market, 1, &calls),
        ok(CollectorKind::Docs, 1, &calls),
        ok(CollectorKind::Metrics, 1, &calls),
        fast_policy(),
        Synthesizer::new(None),
    );

    let result = orchestrator.run("   ", None).await;
    assert_eq!(result.unwrap_err(), OrchestrateError::EmptyTopic);
    assert_eq!(calls.load(Ordering::SeqCst), 0, "no collector should run");
}

#[tokio::test]
async fn transient_failure_is_retried_to_success() {
    let calls = counter();
    let flaky_calls = counter();
    let orchestrator = Orchestrator::new(
        Arc::new(FlakyCollector {
            kind: CollectorKind::Market,
            calls: Arc::clone(&flaky_calls),
        }),
        ok(CollectorKind::Docs, 1, &calls),
        ok(CollectorKind::Metrics, 1, &calls),
        fast_policy(),
        Synthesizer::new(None),
    );

    let report = orchestrator.run("checkout flow", None).await.unwrap();
    assert_eq!(report.market.status, CollectorStatus::Success);
    assert_eq!(flaky_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn slow_collector_times_out_into_failed_slot() {
    let calls = counter();
    let orchestrator = Orchestrator::new(
        Arc::new(SlowCollector {
            kind: CollectorKind::Market,
        }),
        ok(CollectorKind::Docs, 1, &calls),
        ok(CollectorKind::Metrics, 1, &calls),
        fast_policy(),
        Synthesizer::new(None),
    );

    let report = orchestrator.run("checkout flow", None).await.unwrap();
    assert_eq!(report.market.status, CollectorStatus::Failed);
    assert!(report
        .market
        .error
        .as_deref()
        .is_some_and(|e| e.contains("timed out")));
    assert_eq!(report.successful_collector_count, 2);
}

#[tokio::test]
async fn panicking_collector_becomes_failed_slot() {
    let calls = counter();
    let orchestrator = Orchestrator::new(
        ok(CollectorKind::Market, 1, &calls),
        Arc::new(PanickingCollector {
            kind: CollectorKind::Docs,
        }),
        ok(CollectorKind::Metrics, 1, &calls),
        fast_policy(),
        Synthesizer::new(None),
    );

    let report = orchestrator.run("checkout flow", None).await.unwrap();
    assert_eq!(report.docs.status, CollectorStatus::Failed);
    assert!(report
        .docs
        .error
        .as_deref()
        .is_some_and(|e| e.contains("panicked")));
    assert_eq!(report.successful_collector_count, 2);
}

#[tokio::test]
async fn llm_enrichment_lands_in_the_report() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "text": "Overall the signals are positive.",
            "model": "analyst-1",
            "usage": {"prompt_tokens": 100, "completion_tokens": 20}
        })))
        .mount(&server)
        .await;

    let llm = TextGenClient::new(&server.uri(), None, "analyst-1", 5, "sigscout-test").unwrap();
    let calls = counter();
    let orchestrator = Orchestrator::new(
        ok(CollectorKind::Market, 1, &calls),
        ok(CollectorKind::Docs, 1, &calls),
        ok(CollectorKind::Metrics, 1, &calls),
        fast_policy(),
        Synthesizer::new(Some(llm)),
    );

    let report = orchestrator.run("checkout flow", None).await.unwrap();
    let llm = report.synthesis.llm.expect("llm synthesis present");
    assert_eq!(llm.text, "Overall the signals are positive.");
    assert_eq!(llm.prompt_tokens, Some(100));
    assert!(report.synthesis.llm_note.is_none());
}

#[tokio::test]
async fn llm_failure_degrades_to_note() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/generate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let llm = TextGenClient::new(&server.uri(), None, "analyst-1", 5, "sigscout-test").unwrap();
    let calls = counter();
    let orchestrator = Orchestrator::new(
        ok(CollectorKind::Market, 1, &calls),
        ok(CollectorKind::Docs, 1, &calls),
        ok(CollectorKind::Metrics, 1, &calls),
        fast_policy(),
        Synthesizer::new(Some(llm)),
    );

    let report = orchestrator.run("checkout flow", None).await.unwrap();
    assert!(report.synthesis.llm.is_none());
    assert!(report
        .synthesis
        .llm_note
        .as_deref()
        .is_some_and(|n| n.contains("text generation failed")));
}
