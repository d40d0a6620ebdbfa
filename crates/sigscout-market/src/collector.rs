//! The market collector: concurrent gather, prefilter, score, rank.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::time::Duration;

use sigscout_core::relevance::{self, ScoringWeights};
use sigscout_core::sources::FeedConfig;
use sigscout_core::{Collected, Collector, CollectorKind, Signal, SignalKind, TopicQuery};

use crate::client::{NewsArticle, NewsSearchClient, VideoResult, VideoSearchClient};
use crate::error::MarketError;
use crate::feeds::{fetch_feed, FeedItem};
use crate::simulated::{simulated_news, simulated_videos};

/// Items shorter than this (title + description) are never admitted.
const MIN_ITEM_CHARS: usize = 50;

/// How many feeds are fetched at once.
const FEED_CONCURRENCY: usize = 4;

/// External market collector: news search + video search + syndication
/// feeds, gathered concurrently with per-sub-source failure isolation.
pub struct MarketCollector {
    feeds: Vec<FeedConfig>,
    max_results: usize,
    news: Option<NewsSearchClient>,
    video: Option<VideoSearchClient>,
    http: Client,
    weights: ScoringWeights,
}

impl MarketCollector {
    /// Build a market collector. `news`/`video` are `None` when the
    /// matching provider credential is unconfigured; those sub-sources then
    /// use the simulated generators.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Http`] if the feed HTTP client cannot be
    /// built.
    pub fn new(
        feeds: Vec<FeedConfig>,
        max_results: usize,
        news: Option<NewsSearchClient>,
        video: Option<VideoSearchClient>,
        request_timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, MarketError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent.to_owned())
            .build()?;
        Ok(Self {
            feeds,
            max_results,
            news,
            video,
            http,
            weights: ScoringWeights::market(),
        })
    }

    fn search_terms(query: &TopicQuery) -> String {
        match query.focus() {
            Some(focus) => format!("{} {focus}", query.topic()),
            None => query.topic().to_string(),
        }
    }

    async fn gather_news(&self, query: &TopicQuery, now: DateTime<Utc>) -> Vec<Signal> {
        let (articles, simulated) = match &self.news {
            Some(client) => match client.search(&Self::search_terms(query)).await {
                Ok(articles) => (articles, false),
                Err(e) => {
                    tracing::warn!(source = "news_search", error = %e, "news search failed");
                    return Vec::new();
                }
            },
            None => {
                tracing::debug!("no news credential configured, using simulated articles");
                (simulated_news(query, now), true)
            }
        };

        articles
            .into_iter()
            .filter_map(|a| self.news_signal(a, simulated, query, now))
            .collect()
    }

    fn news_signal(
        &self,
        article: NewsArticle,
        simulated: bool,
        query: &TopicQuery,
        now: DateTime<Utc>,
    ) -> Option<Signal> {
        let text = format!("{} {}", article.title, article.description);
        if text.chars().count() < MIN_ITEM_CHARS {
            return None;
        }
        let relevance = relevance::score(&text, query.topic(), query.focus(), &self.weights);
        let combined = relevance::combined_score(relevance, article.published_at, now);

        let mut metadata = serde_json::Map::new();
        metadata.insert("url".to_string(), article.url.into());
        metadata.insert("provider".to_string(), "news_search".into());
        if simulated {
            metadata.insert("simulated".to_string(), true.into());
        }

        Some(Signal {
            kind: SignalKind::NewsArticle,
            title: Some(article.title),
            content: article.description,
            source_label: article.source,
            published_at: article.published_at,
            relevance_score: relevance,
            combined_score: combined,
            metadata,
        })
    }

    async fn gather_video(&self, query: &TopicQuery, now: DateTime<Utc>) -> Vec<Signal> {
        let (videos, simulated) = match &self.video {
            Some(client) => match client.search(&Self::search_terms(query)).await {
                Ok(videos) => (videos, false),
                Err(e) => {
                    tracing::warn!(source = "video_search", error = %e, "video search failed");
                    return Vec::new();
                }
            },
            None => {
                tracing::debug!("no video credential configured, using simulated videos");
                (simulated_videos(query, now), true)
            }
        };

        videos
            .into_iter()
            .filter_map(|v| self.video_signal(v, simulated, query, now))
            .collect()
    }

    fn video_signal(
        &self,
        video: VideoResult,
        simulated: bool,
        query: &TopicQuery,
        now: DateTime<Utc>,
    ) -> Option<Signal> {
        let text = format!("{} {}", video.title, video.description);
        if text.chars().count() < MIN_ITEM_CHARS {
            return None;
        }
        let relevance = relevance::score(&text, query.topic(), query.focus(), &self.weights);
        let combined = relevance::combined_score(relevance, video.published_at, now);

        let mut metadata = serde_json::Map::new();
        metadata.insert("url".to_string(), video.url.into());
        metadata.insert("channel".to_string(), video.channel.clone().into());
        metadata.insert("provider".to_string(), "video_search".into());
        if simulated {
            metadata.insert("simulated".to_string(), true.into());
        }

        Some(Signal {
            kind: SignalKind::VideoItem,
            title: Some(video.title),
            content: video.description,
            source_label: video.channel,
            published_at: video.published_at,
            relevance_score: relevance,
            combined_score: combined,
            metadata,
        })
    }

    /// Fetch all configured feeds concurrently. Results are re-assembled in
    /// declaration order so ranking tie-breaks stay reproducible across
    /// runs despite network jitter.
    async fn gather_feeds(&self, query: &TopicQuery, now: DateTime<Utc>) -> Vec<Signal> {
        let mut fetches = Vec::with_capacity(self.feeds.len());
        for (index, feed) in self.feeds.iter().enumerate() {
            let http = &self.http;
            fetches.push(async move {
                match fetch_feed(http, &feed.url).await {
                    Ok(items) => {
                        tracing::debug!(feed = %feed.name, count = items.len(), "fetched feed");
                        (index, feed, items)
                    }
                    Err(e) => {
                        tracing::warn!(feed = %feed.name, error = %e, "feed fetch failed");
                        (index, feed, Vec::new())
                    }
                }
            });
        }
        let mut fetched: Vec<(usize, &FeedConfig, Vec<FeedItem>)> = stream::iter(fetches)
            .buffer_unordered(FEED_CONCURRENCY)
            .collect()
            .await;
        fetched.sort_by_key(|(index, _, _)| *index);

        let mut signals = Vec::new();
        for (_, feed, items) in fetched {
            for item in items {
                if let Some(signal) = self.feed_signal(&feed.name, item, query, now) {
                    signals.push(signal);
                }
            }
        }
        signals
    }

    fn feed_signal(
        &self,
        feed_name: &str,
        item: FeedItem,
        query: &TopicQuery,
        now: DateTime<Utc>,
    ) -> Option<Signal> {
        let text = format!("{} {}", item.title, item.description);
        if text.chars().count() < MIN_ITEM_CHARS {
            return None;
        }
        // Feeds are not topic-scoped at the provider, so require a direct
        // topic or focus mention before scoring.
        let haystack = text.to_lowercase();
        let topic_hit = haystack.contains(&query.topic().to_lowercase());
        let focus_hit = query
            .focus()
            .is_some_and(|f| haystack.contains(&f.to_lowercase()));
        if !topic_hit && !focus_hit {
            return None;
        }

        let relevance = relevance::score(&text, query.topic(), query.focus(), &self.weights);
        let combined = relevance::combined_score(relevance, item.published_at, now);

        let mut metadata = serde_json::Map::new();
        metadata.insert("url".to_string(), item.link.into());
        metadata.insert("feed".to_string(), feed_name.to_owned().into());
        metadata.insert("provider".to_string(), "rss".into());

        Some(Signal {
            kind: SignalKind::FeedArticle,
            title: Some(item.title),
            content: item.description,
            source_label: feed_name.to_string(),
            published_at: item.published_at,
            relevance_score: relevance,
            combined_score: combined,
            metadata,
        })
    }
}

#[async_trait]
impl Collector for MarketCollector {
    fn kind(&self) -> CollectorKind {
        CollectorKind::Market
    }

    async fn collect(&self, query: &TopicQuery) -> anyhow::Result<Collected> {
        let now = Utc::now();

        let (news, video, feeds) = tokio::join!(
            self.gather_news(query, now),
            self.gather_video(query, now),
            self.gather_feeds(query, now),
        );

        // Fixed sub-source order (news, video, feeds-by-declaration) keeps
        // the stable-sort tie-break independent of arrival order.
        let mut signals: Vec<Signal> = news.into_iter().chain(video).chain(feeds).collect();
        relevance::rank_and_truncate(&mut signals, self.max_results);

        tracing::info!(
            topic = query.topic(),
            count = signals.len(),
            "market collection complete"
        );
        Ok(Collected::new(signals))
    }
}
