//! Topic relevance scoring shared by all collectors.
//!
//! Scoring is a pure function of (text, topic, focus, weights): no hidden
//! state, no randomness, no time dependence. Matching is case-insensitive
//! substring plus normalized whole-word comparison, so no regex is ever
//! compiled from user input, so topics containing punctuation or
//! regex-special characters are safe.

use chrono::{DateTime, Utc};

use crate::types::Signal;

/// Minimum text length (chars) for the default relevance prefilter.
pub const DEFAULT_MIN_TEXT_LEN: usize = 100;

/// Weight table for [`score`]. The two presets carry forward the divergent
/// constants of the collector families as tunable configuration.
#[derive(Debug, Clone)]
pub struct ScoringWeights {
    /// Bonus when the full topic phrase appears as a substring.
    pub topic_phrase: f64,
    /// Bonus when the full focus phrase appears as a substring.
    pub focus_phrase: f64,
    /// Increment per matched topic/focus word.
    pub word_match: f64,
    /// When true, each occurrence of a word counts (uncapped per word);
    /// when false, a word contributes at most once.
    pub count_occurrences: bool,
    /// Texts longer than this earn `quality_bonus`.
    pub length_bonus_threshold: Option<usize>,
    /// Texts containing any of these (lowercase) earn `quality_bonus`.
    pub quality_keywords: Vec<String>,
    pub quality_bonus: f64,
}

impl ScoringWeights {
    /// Market-style weights: strong phrase match, per-occurrence word
    /// counting, no quality bonuses.
    #[must_use]
    pub fn market() -> Self {
        Self {
            topic_phrase: 0.5,
            focus_phrase: 0.3,
            word_match: 0.1,
            count_occurrences: true,
            length_bonus_threshold: None,
            quality_keywords: Vec::new(),
            quality_bonus: 0.0,
        }
    }

    /// Document-style weights: softer phrase match, once-per-word counting,
    /// length and domain-keyword quality bonuses.
    #[must_use]
    pub fn document() -> Self {
        Self {
            topic_phrase: 0.3,
            focus_phrase: 0.2,
            word_match: 0.1,
            count_occurrences: false,
            length_bonus_threshold: Some(1000),
            quality_keywords: vec!["interview".to_string(), "research".to_string()],
            quality_bonus: 0.1,
        }
    }
}

/// Lowercase a word and strip leading/trailing non-alphanumerics, so
/// `"checkout!"` matches `"checkout"`.
fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

fn normalized_terms(phrase: &str) -> Vec<String> {
    phrase
        .split_whitespace()
        .map(normalize_word)
        .filter(|w| !w.is_empty())
        .collect()
}

/// Compute a relevance score in `[0, 1]` for `text` against `topic` and an
/// optional `focus` term.
///
/// Deterministic and clamped: repeated calls with identical inputs yield
/// identical output, and the result is never negative or above 1.
#[must_use]
pub fn score(text: &str, topic: &str, focus: Option<&str>, weights: &ScoringWeights) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let haystack = text.to_lowercase();
    let topic_phrase = topic.trim().to_lowercase();
    let focus_phrase = focus
        .map(|f| f.trim().to_lowercase())
        .filter(|f| !f.is_empty());

    let mut total = 0.0_f64;

    if !topic_phrase.is_empty() && haystack.contains(&topic_phrase) {
        total += weights.topic_phrase;
    }
    if let Some(ref fp) = focus_phrase {
        if haystack.contains(fp) {
            total += weights.focus_phrase;
        }
    }

    let words: Vec<String> = haystack
        .split_whitespace()
        .map(normalize_word)
        .filter(|w| !w.is_empty())
        .collect();

    // Unique terms only, so a word shared by topic and focus counts once.
    let mut terms: Vec<String> = Vec::new();
    let focus_terms = focus_phrase
        .as_deref()
        .map(normalized_terms)
        .unwrap_or_default();
    for term in normalized_terms(&topic_phrase).into_iter().chain(focus_terms) {
        if !terms.contains(&term) {
            terms.push(term);
        }
    }

    for term in &terms {
        let hits = words.iter().filter(|w| *w == term).count();
        if hits == 0 {
            continue;
        }
        if weights.count_occurrences {
            #[allow(clippy::cast_precision_loss)]
            let hits_f = hits as f64;
            total += hits_f * weights.word_match;
        } else {
            total += weights.word_match;
        }
    }

    if let Some(threshold) = weights.length_bonus_threshold {
        if text.chars().count() > threshold {
            total += weights.quality_bonus;
        }
    }
    if weights
        .quality_keywords
        .iter()
        .any(|k| haystack.contains(k.as_str()))
    {
        total += weights.quality_bonus;
    }

    total.clamp(0.0, 1.0)
}

/// Cheap prefilter applied before the scoring pass, with the default
/// 100-char minimum length.
#[must_use]
pub fn is_relevant(text: &str, topic: &str, focus: Option<&str>) -> bool {
    is_relevant_with_min(text, topic, focus, DEFAULT_MIN_TEXT_LEN)
}

/// Prefilter with an explicit minimum length: text must exceed `min_len`
/// chars AND contain the topic phrase, the focus phrase, or at least one
/// topic word as a case-insensitive substring.
#[must_use]
pub fn is_relevant_with_min(text: &str, topic: &str, focus: Option<&str>, min_len: usize) -> bool {
    let trimmed = text.trim();
    if trimmed.chars().count() <= min_len {
        return false;
    }

    let haystack = trimmed.to_lowercase();
    let topic_phrase = topic.trim().to_lowercase();
    if !topic_phrase.is_empty() && haystack.contains(&topic_phrase) {
        return true;
    }
    if let Some(focus) = focus {
        let focus_phrase = focus.trim().to_lowercase();
        if !focus_phrase.is_empty() && haystack.contains(&focus_phrase) {
            return true;
        }
    }
    normalized_terms(&topic_phrase)
        .iter()
        .any(|w| haystack.contains(w.as_str()))
}

/// Recency step function over age in days. Items without a timestamp score
/// 0. Ages up to one day (including future-dated items) score 1.0.
#[must_use]
pub fn recency_score(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(published) = published_at else {
        return 0.0;
    };
    let age_days = (now - published).num_days();
    if age_days <= 1 {
        1.0
    } else if age_days <= 7 {
        0.8
    } else if age_days <= 30 {
        0.6
    } else {
        0.3
    }
}

/// Blend relevance with recency for ranking.
///
/// Timestamped signals: `relevance × 0.7 + recency × 0.3`. Untimestamped
/// signals (document findings, metrics) rank on relevance alone.
#[must_use]
pub fn combined_score(
    relevance: f64,
    published_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> f64 {
    if published_at.is_some() {
        relevance * 0.7 + recency_score(published_at, now) * 0.3
    } else {
        relevance
    }
}

/// Sort signals by non-increasing combined score and truncate to `max`.
///
/// The sort is stable, so ties keep their original discovery order (the
/// order sub-sources were declared in configuration, not arrival order), which
/// keeps results reproducible despite network jitter.
pub fn rank_and_truncate(signals: &mut Vec<Signal>, max: usize) {
    signals.sort_by(|a, b| {
        b.combined_score
            .partial_cmp(&a.combined_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    signals.truncate(max);
}
