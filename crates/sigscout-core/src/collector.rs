//! The collector capability seam.

use async_trait::async_trait;

use crate::types::{CollectorKind, Signal};

/// A validated topic/focus pair for one orchestration run.
#[derive(Debug, Clone)]
pub struct TopicQuery {
    topic: String,
    focus: Option<String>,
}

impl TopicQuery {
    /// Build a query, trimming whitespace. Returns `None` when the topic is
    /// empty after trimming; an empty focus collapses to no focus.
    #[must_use]
    pub fn new(topic: &str, focus: Option<&str>) -> Option<Self> {
        let topic = topic.trim();
        if topic.is_empty() {
            return None;
        }
        let focus = focus
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(ToString::to_string);
        Some(Self {
            topic: topic.to_string(),
            focus,
        })
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }
}

/// What a collector hands back on success: ranked, truncated signals plus
/// an optional informational note (e.g. "no files discovered").
#[derive(Debug, Default)]
pub struct Collected {
    pub signals: Vec<Signal>,
    pub note: Option<String>,
}

impl Collected {
    #[must_use]
    pub fn new(signals: Vec<Signal>) -> Self {
        Self {
            signals,
            note: None,
        }
    }

    #[must_use]
    pub fn with_note(signals: Vec<Signal>, note: impl Into<String>) -> Self {
        Self {
            signals,
            note: Some(note.into()),
        }
    }
}

/// One signal collector (market, docs, or metrics).
///
/// Implementations gather from their sub-sources concurrently and isolate
/// individual sub-source failures internally; an `Err` from `collect`
/// means the whole collector attempt failed and is subject to the
/// orchestrator's retry policy.
#[async_trait]
pub trait Collector: Send + Sync {
    fn kind(&self) -> CollectorKind;

    async fn collect(&self, query: &TopicQuery) -> anyhow::Result<Collected>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_trims_topic_and_focus() {
        let q = TopicQuery::new("  checkout flow  ", Some("  payments ")).expect("valid");
        assert_eq!(q.topic(), "checkout flow");
        assert_eq!(q.focus(), Some("payments"));
    }

    #[test]
    fn empty_topic_is_rejected() {
        assert!(TopicQuery::new("", None).is_none());
        assert!(TopicQuery::new("   \t ", Some("focus")).is_none());
    }

    #[test]
    fn blank_focus_collapses_to_none() {
        let q = TopicQuery::new("checkout", Some("   ")).expect("valid");
        assert_eq!(q.focus(), None);
    }
}
