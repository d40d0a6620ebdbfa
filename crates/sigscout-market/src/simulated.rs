//! Deterministic simulated market data.
//!
//! Used whenever a search provider has no configured credential. Output is
//! a pure function of (topic, focus, now) so runs are reproducible; every
//! item is tagged as simulated by the collector.

use chrono::{DateTime, Duration, Utc};

use sigscout_core::TopicQuery;

use crate::client::{NewsArticle, VideoResult};

/// Generate simulated news articles for a topic.
///
/// Timestamps are staggered across the recency tiers (fresh, this week,
/// this month, older) so ranking behaviour is exercised realistically.
#[must_use]
pub fn simulated_news(query: &TopicQuery, now: DateTime<Utc>) -> Vec<NewsArticle> {
    let topic = query.topic();
    let focus_clause = query
        .focus()
        .map(|f| format!(" with particular attention to {f}"))
        .unwrap_or_default();

    let entries: [(&str, String, i64); 4] = [
        (
            "market-pulse",
            format!(
                "Industry analysts published a survey of recent {topic} initiatives{focus_clause}, \
                 noting accelerating investment across mid-market vendors."
            ),
            0,
        ),
        (
            "daily-brief",
            format!(
                "A competitor announced a revamped approach to {topic}, claiming double-digit \
                 improvements in customer satisfaction benchmarks."
            ),
            3,
        ),
        (
            "sector-watch",
            format!(
                "Commentary roundup: practitioners debate whether {topic} programs deliver \
                 measurable returns{focus_clause}."
            ),
            12,
        ),
        (
            "archive-digest",
            format!(
                "Retrospective: how leading teams approached {topic} last year, and what \
                 changed since early pilots."
            ),
            45,
        ),
    ];

    entries
        .into_iter()
        .enumerate()
        .map(|(i, (source, description, age_days))| NewsArticle {
            title: format!("Simulated coverage of {topic} ({})", i + 1),
            description,
            source: source.to_string(),
            url: format!("https://simulated.sigscout.local/news/{i}"),
            published_at: Some(now - Duration::days(age_days)),
        })
        .collect()
}

/// Generate simulated video results for a topic.
#[must_use]
pub fn simulated_videos(query: &TopicQuery, now: DateTime<Utc>) -> Vec<VideoResult> {
    let topic = query.topic();
    let focus_clause = query
        .focus()
        .map(|f| format!(", including a segment on {f}"))
        .unwrap_or_default();

    let entries: [(&str, String, i64); 3] = [
        (
            "conference-talks",
            format!(
                "Recorded conference session walking through a production rollout of {topic}\
                 {focus_clause}, with audience Q&A."
            ),
            1,
        ),
        (
            "practitioner-channel",
            format!(
                "Hands-on walkthrough video demonstrating common pitfalls teams hit when \
                 adopting {topic}."
            ),
            6,
        ),
        (
            "panel-archive",
            format!(
                "Panel discussion on the state of {topic}: three practitioners compare notes \
                 on rollout strategy and measurement."
            ),
            25,
        ),
    ];

    entries
        .into_iter()
        .enumerate()
        .map(|(i, (channel, description, age_days))| VideoResult {
            title: format!("Simulated video on {topic} ({})", i + 1),
            description,
            channel: channel.to_string(),
            url: format!("https://simulated.sigscout.local/video/{i}"),
            published_at: Some(now - Duration::days(age_days)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> TopicQuery {
        TopicQuery::new("checkout flow", Some("payments")).unwrap()
    }

    #[test]
    fn simulated_news_is_nonempty_and_on_topic() {
        let articles = simulated_news(&query(), Utc::now());
        assert!(!articles.is_empty());
        for article in &articles {
            let text = format!("{} {}", article.title, article.description);
            assert!(text.to_lowercase().contains("checkout flow"), "off-topic: {text}");
            assert!(text.len() >= 50, "too short to pass the prefilter: {text}");
        }
    }

    #[test]
    fn simulated_output_is_deterministic() {
        let now = Utc::now();
        let a = simulated_news(&query(), now);
        let b = simulated_news(&query(), now);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.title, y.title);
            assert_eq!(x.description, y.description);
            assert_eq!(x.published_at, y.published_at);
        }
    }

    #[test]
    fn simulated_videos_cover_recency_tiers() {
        let now = Utc::now();
        let videos = simulated_videos(&query(), now);
        assert_eq!(videos.len(), 3);
        let ages: Vec<i64> = videos
            .iter()
            .map(|v| (now - v.published_at.unwrap()).num_days())
            .collect();
        assert!(ages.iter().any(|&a| a <= 1));
        assert!(ages.iter().any(|&a| a > 7));
    }
}
