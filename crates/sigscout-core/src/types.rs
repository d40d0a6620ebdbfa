//! Canonical report data model.
//!
//! Every layer (collectors, orchestrator, synthesizer, CLI artifacts)
//! produces and consumes these shapes directly; there is no per-layer
//! renaming. All types serialize losslessly to plain JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminates the source family and metadata shape of a [`Signal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    NewsArticle,
    VideoItem,
    FeedArticle,
    DocumentFinding,
    SimulatedMetric,
    CustomMetric,
}

/// One scored, ranked unit of gathered information.
///
/// Created once by a collector immediately after fetching or generating raw
/// data, scored at creation, and never mutated after insertion into a
/// ranked list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    /// Absent for metric kinds.
    pub title: Option<String>,
    /// Text body used for scoring.
    pub content: String,
    /// Human-readable origin: publication, file name, or endpoint.
    pub source_label: String,
    /// Absent for document findings and metric kinds.
    pub published_at: Option<DateTime<Utc>>,
    /// Relevance in `[0, 1]`, assigned by the scorer.
    pub relevance_score: f64,
    /// Relevance blended with recency, in `[0, 1]`. Used only for ranking.
    pub combined_score: f64,
    /// Kind-specific open bag (author, URL, path, headings, statistics).
    /// Simulated data always carries `"simulated": true` here.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Signal {
    /// Whether this signal was produced by a simulated fallback source.
    #[must_use]
    pub fn is_simulated(&self) -> bool {
        self.metadata
            .get("simulated")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }
}

/// Identity of a collector slot in the report. Slots are filled by
/// identity, never by completion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectorKind {
    /// External market content: news, video, syndication feeds.
    Market,
    /// Internal documents scanned from local directories.
    Docs,
    /// Product metrics, simulated or endpoint-backed.
    Metrics,
}

impl std::fmt::Display for CollectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectorKind::Market => write!(f, "market"),
            CollectorKind::Docs => write!(f, "docs"),
            CollectorKind::Metrics => write!(f, "metrics"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectorStatus {
    Success,
    Failed,
}

/// Outcome of one collector invocation.
///
/// Invariant: `Failed` implies `signals` is empty. `Success` with empty
/// `signals` is a legitimate "nothing found" outcome, distinct from failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorResult {
    pub collector: CollectorKind,
    pub status: CollectorStatus,
    /// Insertion order is rank order: non-increasing `combined_score`.
    pub signals: Vec<Signal>,
    /// Last error message; present only when `status` is `Failed`.
    pub error: Option<String>,
    /// Informational note on success (e.g. "no files discovered").
    pub note: Option<String>,
    pub execution_time_ms: u64,
}

impl CollectorResult {
    #[must_use]
    pub fn success(
        collector: CollectorKind,
        signals: Vec<Signal>,
        note: Option<String>,
        execution_time_ms: u64,
    ) -> Self {
        Self {
            collector,
            status: CollectorStatus::Success,
            signals,
            error: None,
            note,
            execution_time_ms,
        }
    }

    #[must_use]
    pub fn failure(collector: CollectorKind, error: String, execution_time_ms: u64) -> Self {
        Self {
            collector,
            status: CollectorStatus::Failed,
            signals: Vec::new(),
            error: Some(error),
            note: None,
            execution_time_ms,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == CollectorStatus::Success
    }

    /// Signal count contributed to the report: failed slots contribute 0.
    #[must_use]
    pub fn item_count(&self) -> usize {
        match self.status {
            CollectorStatus::Success => self.signals.len(),
            CollectorStatus::Failed => 0,
        }
    }

    /// Success with at least one signal, the predicate the cross-reference
    /// rule table consumes.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.is_success() && !self.signals.is_empty()
    }
}

/// Coarse per-collector signal volume label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStrength {
    Strong,
    Medium,
    Weak,
}

/// Coarse whole-report reliability label, driven by total signal count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reliability {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    /// `successful_collector_count / 3 × 100`.
    pub coverage_percent: f64,
    pub market_strength: SignalStrength,
    pub docs_strength: SignalStrength,
    pub metrics_strength: SignalStrength,
    pub reliability: Reliability,
}

/// One cross-source validation opportunity, derived purely from which
/// collectors succeeded with non-empty signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossReference {
    pub description: String,
    pub priority: Priority,
}

/// Output of a successful text-generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSynthesis {
    pub text: String,
    pub model: String,
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub elapsed_ms: u64,
}

/// Synthesis output. The enriched `prompt` is always present so a report is
/// usable for manual consumption even when the text-generation call is
/// unavailable or failed (the reason lands in `llm_note`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Synthesis {
    pub prompt: String,
    pub summary: ExecutiveSummary,
    pub cross_references: Vec<CrossReference>,
    pub llm: Option<LlmSynthesis>,
    pub llm_note: Option<String>,
}

/// The final aggregate for one orchestration run. Built once, never
/// partially mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationReport {
    pub run_id: Uuid,
    pub topic: String,
    pub focus: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub market: CollectorResult,
    pub docs: CollectorResult,
    pub metrics: CollectorResult,
    /// Sum of signal counts across successful collectors; 0 if all failed.
    pub total_signal_count: usize,
    /// In `[0, 3]`.
    pub successful_collector_count: usize,
    pub execution_time_ms: u64,
    pub synthesis: Synthesis,
}

impl OrchestrationReport {
    /// The three collector slots in their canonical order.
    #[must_use]
    pub fn results(&self) -> [&CollectorResult; 3] {
        [&self.market, &self.docs, &self.metrics]
    }
}
