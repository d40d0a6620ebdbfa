//! The docs collector: scan, extract (cached), prefilter, emit findings.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use sigscout_core::relevance::{self, ScoringWeights};
use sigscout_core::sources::ScanConfig;
use sigscout_core::{Collected, Collector, CollectorKind, Signal, SignalKind, TopicQuery};

use crate::cache::ExtractCache;
use crate::error::DocsError;
use crate::extract::{extract, split_sentences, DocumentFormat, ExtractedDoc};
use crate::scan::discover_files;

/// Sentences shorter than this are too fragmentary to stand as findings.
const MIN_FINDING_CHARS: usize = 50;

/// How many files are read at once.
const READ_CONCURRENCY: usize = 8;

/// Internal document collector. The extraction cache lives for the
/// collector's lifetime, so repeated runs in one process skip re-reading
/// unchanged files.
pub struct DocsCollector {
    scan: ScanConfig,
    max_results: usize,
    min_document_chars: usize,
    cache: ExtractCache,
    weights: ScoringWeights,
}

impl DocsCollector {
    #[must_use]
    pub fn new(scan: ScanConfig, max_results: usize, min_document_chars: usize) -> Self {
        Self {
            scan,
            max_results,
            min_document_chars,
            cache: ExtractCache::new(),
            weights: ScoringWeights::document(),
        }
    }

    /// Read and extract one file, consulting the cache first. Returns
    /// `None` when the file cannot be read (skip, log, continue).
    async fn load(&self, path: &Path) -> Option<(DocumentFormat, Arc<ExtractedDoc>)> {
        let ext = path.extension().and_then(|e| e.to_str())?.to_lowercase();
        let format = DocumentFormat::from_extension(&ext)?;

        let mtime = match tokio::fs::metadata(path).await {
            Ok(meta) => meta.modified().ok(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "metadata read failed, skipping");
                return None;
            }
        };

        if let Some(mtime) = mtime {
            if let Some(cached) = self.cache.get(path, mtime) {
                tracing::debug!(path = %path.display(), "extraction cache hit");
                return Some((format, cached));
            }
        }

        let raw = match read_raw(path).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable file");
                return None;
            }
        };

        let doc = extract(format, &raw);
        let doc = match mtime {
            Some(mtime) => self.cache.insert(path, mtime, doc),
            None => Arc::new(doc),
        };
        Some((format, doc))
    }

    /// Turn one relevant document into finding signals: one per sentence
    /// containing the topic or focus term. A relevant document whose
    /// sentences are all too short still contributes a single
    /// document-level finding so short, directly on-topic notes are not
    /// lost.
    fn findings(
        &self,
        path: &Path,
        format: DocumentFormat,
        doc: &ExtractedDoc,
        query: &TopicQuery,
    ) -> Vec<Signal> {
        let relevance_score =
            relevance::score(&doc.text, query.topic(), query.focus(), &self.weights);
        let topic_lc = query.topic().to_lowercase();
        let focus_lc = query.focus().map(str::to_lowercase);

        let matching: Vec<String> = split_sentences(&doc.text)
            .into_iter()
            .filter(|sentence| {
                let hay = sentence.to_lowercase();
                hay.contains(&topic_lc)
                    || focus_lc.as_deref().is_some_and(|f| hay.contains(f))
            })
            .filter(|sentence| sentence.chars().count() >= MIN_FINDING_CHARS)
            .collect();

        let contents = if matching.is_empty() {
            vec![doc.text.clone()]
        } else {
            matching
        };

        contents
            .into_iter()
            .map(|content| self.finding_signal(path, format, doc, content, relevance_score))
            .collect()
    }

    fn finding_signal(
        &self,
        path: &Path,
        format: DocumentFormat,
        doc: &ExtractedDoc,
        content: String,
        relevance_score: f64,
    ) -> Signal {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        let title = doc
            .headings
            .first()
            .cloned()
            .unwrap_or_else(|| file_name.clone());

        let mut metadata = serde_json::Map::new();
        metadata.insert("path".to_string(), path.display().to_string().into());
        metadata.insert("format".to_string(), format.label().into());
        if !doc.headings.is_empty() {
            metadata.insert("headings".to_string(), doc.headings.clone().into());
        }
        if !doc.speakers.is_empty() {
            metadata.insert("speakers".to_string(), doc.speakers.clone().into());
        }

        Signal {
            kind: SignalKind::DocumentFinding,
            title: Some(title),
            content,
            source_label: file_name,
            published_at: None,
            relevance_score,
            // Findings carry no timestamp, so they rank on relevance alone.
            combined_score: relevance_score,
            metadata,
        }
    }
}

async fn read_raw(path: &Path) -> Result<String, DocsError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DocsError::Io {
            path: path.display().to_string(),
            source,
        })
}

#[async_trait]
impl Collector for DocsCollector {
    fn kind(&self) -> CollectorKind {
        CollectorKind::Docs
    }

    async fn collect(&self, query: &TopicQuery) -> anyhow::Result<Collected> {
        let files = discover_files(&self.scan);
        if files.is_empty() {
            tracing::info!("no files discovered under configured directories");
            return Ok(Collected::with_note(
                Vec::new(),
                "no files discovered under configured directories",
            ));
        }
        let file_count = files.len();

        // Bounded-concurrency reads, re-assembled into scan order so
        // ranking tie-breaks stay reproducible.
        let mut loaded: Vec<(usize, PathBuf, DocumentFormat, Arc<ExtractedDoc>)> =
            stream::iter(files.into_iter().enumerate())
                .map(|(index, path)| async move {
                    let loaded = self.load(&path).await;
                    loaded.map(|(format, doc)| (index, path, format, doc))
                })
                .buffer_unordered(READ_CONCURRENCY)
                .filter_map(|item| async move { item })
                .collect()
                .await;
        loaded.sort_by_key(|(index, _, _, _)| *index);

        let mut signals = Vec::new();
        for (_, path, format, doc) in &loaded {
            if !relevance::is_relevant_with_min(
                &doc.text,
                query.topic(),
                query.focus(),
                self.min_document_chars,
            ) {
                continue;
            }
            signals.extend(self.findings(path, *format, doc, query));
        }

        relevance::rank_and_truncate(&mut signals, self.max_results);

        tracing::info!(
            topic = query.topic(),
            files = file_count,
            count = signals.len(),
            "docs collection complete"
        );

        if signals.is_empty() {
            return Ok(Collected::with_note(
                signals,
                format!("scanned {file_count} files, none relevant to the topic"),
            ));
        }
        Ok(Collected::new(signals))
    }
}
