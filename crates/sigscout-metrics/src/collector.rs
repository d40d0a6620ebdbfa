//! The product metrics collector: per-category fetch, trend analysis,
//! custom endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;

use sigscout_core::relevance::{self, ScoringWeights};
use sigscout_core::sources::EndpointConfig;
use sigscout_core::{Collected, Collector, CollectorKind, Signal, SignalKind, TopicQuery};

use crate::endpoints::{AnalyticsClient, AnalyticsMetric, EndpointClient, EndpointMetric};
use crate::error::MetricsError;
use crate::insights::recommendation;
use crate::provider::{MetricCategory, MetricSeries, MetricsProvider};
use crate::trends::trend_of;

/// Product metrics collector: fixed categories from a pluggable provider,
/// plus optional custom endpoints and the analytics platform. Every
/// sub-source failure is isolated.
pub struct MetricsCollector {
    provider: Arc<dyn MetricsProvider>,
    endpoints: Vec<EndpointConfig>,
    endpoint_client: Option<EndpointClient>,
    analytics: Option<AnalyticsClient>,
    max_results: usize,
    weights: ScoringWeights,
}

impl MetricsCollector {
    /// # Errors
    ///
    /// Returns [`MetricsError::Http`] if the endpoint HTTP client cannot be
    /// built.
    pub fn new(
        provider: Arc<dyn MetricsProvider>,
        endpoints: Vec<EndpointConfig>,
        analytics: Option<AnalyticsClient>,
        max_results: usize,
        request_timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, MetricsError> {
        let endpoint_client = if endpoints.is_empty() {
            None
        } else {
            Some(EndpointClient::new(request_timeout_secs, user_agent)?)
        };
        Ok(Self {
            provider,
            endpoints,
            endpoint_client,
            analytics,
            max_results,
            weights: ScoringWeights::market(),
        })
    }

    fn search_terms(query: &TopicQuery) -> String {
        match query.focus() {
            Some(focus) => format!("{} {focus}", query.topic()),
            None => query.topic().to_string(),
        }
    }

    /// Fetch all fixed categories concurrently; a failing category logs a
    /// warning and contributes nothing.
    async fn gather_categories(&self, query: &TopicQuery) -> Vec<MetricSeries> {
        let fetches = MetricCategory::ALL.map(|category| async move {
            match self.provider.fetch(category, query).await {
                Ok(series) => series,
                Err(e) => {
                    tracing::warn!(category = category.label(), error = %e, "category fetch failed");
                    Vec::new()
                }
            }
        });

        join_all(fetches).await.into_iter().flatten().collect()
    }

    fn series_signal(&self, series: &MetricSeries, query: &TopicQuery) -> Option<Signal> {
        let trend = trend_of(series)?;
        let advice = recommendation(&trend);

        let content = format!(
            "{} metric {} for {}: latest {:.2} {}, mean {:.2} over {} points, {} {:+.1}%. {}",
            series.category.label(),
            series.name,
            query.topic(),
            trend.last,
            series.unit,
            trend.mean,
            series.points.len(),
            trend.direction.label(),
            trend.percent_change,
            advice,
        );
        let relevance = relevance::score(&content, query.topic(), query.focus(), &self.weights);

        let mut metadata = serde_json::Map::new();
        metadata.insert("category".to_string(), series.category.label().into());
        metadata.insert("unit".to_string(), series.unit.clone().into());
        metadata.insert("first".to_string(), trend.first.into());
        metadata.insert("last".to_string(), trend.last.into());
        metadata.insert("mean".to_string(), trend.mean.into());
        metadata.insert("min".to_string(), trend.min.into());
        metadata.insert("max".to_string(), trend.max.into());
        metadata.insert("percent_change".to_string(), trend.percent_change.into());
        metadata.insert("direction".to_string(), trend.direction.label().into());
        metadata.insert("recommendation".to_string(), advice.into());
        if series.simulated {
            metadata.insert("simulated".to_string(), true.into());
        }

        Some(Signal {
            kind: if series.simulated {
                SignalKind::SimulatedMetric
            } else {
                SignalKind::CustomMetric
            },
            title: Some(series.name.clone()),
            content,
            source_label: series.source.clone(),
            published_at: None,
            relevance_score: relevance,
            // Metric signals carry no timestamp and rank on relevance alone.
            combined_score: relevance,
            metadata,
        })
    }

    async fn gather_endpoints(&self, query: &TopicQuery) -> Vec<Signal> {
        let Some(client) = &self.endpoint_client else {
            return Vec::new();
        };

        let fetches = self.endpoints.iter().map(|endpoint| async move {
            match client.fetch(&endpoint.url).await {
                Ok(metrics) => {
                    tracing::debug!(endpoint = %endpoint.name, count = metrics.len(), "fetched endpoint");
                    (endpoint, metrics)
                }
                Err(e) => {
                    tracing::warn!(endpoint = %endpoint.name, error = %e, "endpoint fetch failed");
                    (endpoint, Vec::new())
                }
            }
        });

        join_all(fetches)
            .await
            .into_iter()
            .flat_map(|(endpoint, metrics)| {
                metrics
                    .into_iter()
                    .map(|m| self.endpoint_signal(&endpoint.name, m, query))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn endpoint_signal(
        &self,
        endpoint_name: &str,
        metric: EndpointMetric,
        query: &TopicQuery,
    ) -> Signal {
        let unit = metric.unit.clone().unwrap_or_default();
        let content = format!(
            "custom metric {} from {} for {}: current value {:.2} {}",
            metric.name,
            endpoint_name,
            query.topic(),
            metric.value,
            unit,
        );
        let relevance = relevance::score(&content, query.topic(), query.focus(), &self.weights);

        let mut metadata = serde_json::Map::new();
        metadata.insert("value".to_string(), metric.value.into());
        if let Some(unit) = metric.unit {
            metadata.insert("unit".to_string(), unit.into());
        }
        metadata.insert("endpoint".to_string(), endpoint_name.to_owned().into());
        metadata.insert("provider".to_string(), "custom_endpoint".into());

        Signal {
            kind: SignalKind::CustomMetric,
            title: Some(metric.name),
            content,
            source_label: endpoint_name.to_string(),
            published_at: None,
            relevance_score: relevance,
            combined_score: relevance,
            metadata,
        }
    }

    async fn gather_analytics(&self, query: &TopicQuery) -> Vec<Signal> {
        let Some(client) = &self.analytics else {
            return Vec::new();
        };
        let metrics = match client.fetch(&Self::search_terms(query)).await {
            Ok(metrics) => metrics,
            Err(e) => {
                tracing::warn!(source = "analytics", error = %e, "analytics fetch failed");
                return Vec::new();
            }
        };
        metrics
            .into_iter()
            .map(|m| self.analytics_signal(m, query))
            .collect()
    }

    fn analytics_signal(&self, metric: AnalyticsMetric, query: &TopicQuery) -> Signal {
        let unit = metric.unit.clone().unwrap_or_default();
        let content = format!(
            "{} metric {} for {}: current value {:.2} {}",
            metric.category,
            metric.name,
            query.topic(),
            metric.value,
            unit,
        );
        let relevance = relevance::score(&content, query.topic(), query.focus(), &self.weights);

        let mut metadata = serde_json::Map::new();
        metadata.insert("category".to_string(), metric.category.into());
        metadata.insert("value".to_string(), metric.value.into());
        if let Some(unit) = metric.unit {
            metadata.insert("unit".to_string(), unit.into());
        }
        metadata.insert("provider".to_string(), "analytics".into());

        Signal {
            kind: SignalKind::CustomMetric,
            title: Some(metric.name),
            content,
            source_label: "analytics".to_string(),
            published_at: None,
            relevance_score: relevance,
            combined_score: relevance,
            metadata,
        }
    }
}

#[async_trait]
impl Collector for MetricsCollector {
    fn kind(&self) -> CollectorKind {
        CollectorKind::Metrics
    }

    async fn collect(&self, query: &TopicQuery) -> anyhow::Result<Collected> {
        let (series, endpoint_signals, analytics_signals) = tokio::join!(
            self.gather_categories(query),
            self.gather_endpoints(query),
            self.gather_analytics(query),
        );

        let mut signals: Vec<Signal> = series
            .iter()
            .filter_map(|s| self.series_signal(s, query))
            .chain(endpoint_signals)
            .chain(analytics_signals)
            .collect();
        relevance::rank_and_truncate(&mut signals, self.max_results);

        tracing::info!(
            topic = query.topic(),
            count = signals.len(),
            "metrics collection complete"
        );
        Ok(Collected::new(signals))
    }
}
