//! The metrics provider seam and the default simulated provider.

use std::hash::{DefaultHasher, Hash, Hasher};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sigscout_core::TopicQuery;

use crate::error::MetricsError;

/// The fixed metric categories every provider is asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricCategory {
    Usage,
    Performance,
    Engagement,
    Conversion,
}

impl MetricCategory {
    pub const ALL: [Self; 4] = [
        Self::Usage,
        Self::Performance,
        Self::Engagement,
        Self::Conversion,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Usage => "usage",
            Self::Performance => "performance",
            Self::Engagement => "engagement",
            Self::Conversion => "conversion",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// One named metric with a short history of points.
#[derive(Debug, Clone)]
pub struct MetricSeries {
    pub name: String,
    pub category: MetricCategory,
    pub unit: String,
    pub points: Vec<MetricPoint>,
    pub simulated: bool,
    pub source: String,
}

/// Pluggable source of product metrics. Each category is fetched
/// independently so one failing category never blocks the others.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    async fn fetch(
        &self,
        category: MetricCategory,
        query: &TopicQuery,
    ) -> Result<Vec<MetricSeries>, MetricsError>;
}

/// Topic keywords that switch the simulated vocabulary to
/// deployment-themed metric names.
const INFRA_KEYWORDS: [&str; 7] = [
    "deploy",
    "deployment",
    "infrastructure",
    "pipeline",
    "build",
    "release",
    "validation",
];

/// Metric template: name, unit, baseline value, per-day drift fraction.
type MetricTemplate = (&'static str, &'static str, f64, f64);

/// Default provider: deterministic synthetic series seeded from the topic
/// and metric identity, so identical queries always produce identical
/// data while distinct topics still look distinct.
pub struct SimulatedMetricsProvider;

impl SimulatedMetricsProvider {
    const DAYS: i64 = 7;

    fn is_infra_topic(query: &TopicQuery) -> bool {
        let haystack = match query.focus() {
            Some(focus) => format!("{} {focus}", query.topic()).to_lowercase(),
            None => query.topic().to_lowercase(),
        };
        INFRA_KEYWORDS.iter().any(|k| haystack.contains(k))
    }

    fn templates(category: MetricCategory, infra: bool) -> &'static [MetricTemplate] {
        match (category, infra) {
            (MetricCategory::Usage, true) => &[
                ("deployments_per_week", "count", 24.0, 0.02),
                ("active_pipelines", "count", 12.0, 0.01),
            ],
            (MetricCategory::Usage, false) => &[
                ("daily_active_users", "users", 4200.0, 0.015),
                ("sessions_per_day", "sessions", 9800.0, 0.01),
            ],
            (MetricCategory::Performance, true) => &[
                ("build_duration", "seconds", 340.0, -0.02),
                ("deploy_success_rate", "percent", 94.0, 0.002),
            ],
            (MetricCategory::Performance, false) => &[
                ("p95_latency", "ms", 480.0, -0.015),
                ("error_rate", "percent", 1.8, -0.01),
            ],
            (MetricCategory::Engagement, true) => &[("pipeline_runs_per_engineer", "count", 6.5, 0.01)],
            (MetricCategory::Engagement, false) => &[
                ("avg_session_length", "minutes", 11.2, 0.008),
                ("feature_interactions", "count", 3.4, 0.012),
            ],
            (MetricCategory::Conversion, true) => &[("release_adoption_rate", "percent", 61.0, 0.015)],
            (MetricCategory::Conversion, false) => &[
                ("signup_conversion", "percent", 4.6, 0.01),
                ("purchase_completion", "percent", 68.0, 0.005),
            ],
        }
    }

    fn seed_for(topic: &str, category: MetricCategory, name: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        topic.to_lowercase().hash(&mut hasher);
        category.label().hash(&mut hasher);
        name.hash(&mut hasher);
        hasher.finish()
    }

    /// Generate one 7-day series: baseline value with a gentle drift plus
    /// seeded per-day jitter. Values never go negative.
    fn series(
        query: &TopicQuery,
        category: MetricCategory,
        template: MetricTemplate,
        now: DateTime<Utc>,
    ) -> MetricSeries {
        let (name, unit, baseline, drift) = template;
        let mut rng = StdRng::seed_from_u64(Self::seed_for(query.topic(), category, name));

        let points = (0..Self::DAYS)
            .map(|day| {
                let age_days = Self::DAYS - 1 - day;
                #[allow(clippy::cast_precision_loss)]
                let progress = day as f64;
                let jitter: f64 = rng.random_range(-0.03..=0.03);
                let value = baseline * (1.0 + drift * progress) * (1.0 + jitter);
                MetricPoint {
                    timestamp: now - Duration::days(age_days),
                    value: (value.max(0.0) * 100.0).round() / 100.0,
                }
            })
            .collect();

        MetricSeries {
            name: name.to_string(),
            category,
            unit: unit.to_string(),
            points,
            simulated: true,
            source: "simulated".to_string(),
        }
    }

    fn generate(
        query: &TopicQuery,
        category: MetricCategory,
        now: DateTime<Utc>,
    ) -> Vec<MetricSeries> {
        let infra = Self::is_infra_topic(query);
        Self::templates(category, infra)
            .iter()
            .map(|template| Self::series(query, category, *template, now))
            .collect()
    }
}

#[async_trait]
impl MetricsProvider for SimulatedMetricsProvider {
    async fn fetch(
        &self,
        category: MetricCategory,
        query: &TopicQuery,
    ) -> Result<Vec<MetricSeries>, MetricsError> {
        Ok(Self::generate(query, category, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(topic: &str) -> TopicQuery {
        TopicQuery::new(topic, None).expect("valid query")
    }

    #[test]
    fn infra_topics_get_deployment_vocabulary() {
        let now = Utc::now();
        let series =
            SimulatedMetricsProvider::generate(&query("deployment pipeline"), MetricCategory::Usage, now);
        let names: Vec<&str> = series.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"deployments_per_week"), "got {names:?}");
    }

    #[test]
    fn product_topics_get_usage_vocabulary() {
        let now = Utc::now();
        let series =
            SimulatedMetricsProvider::generate(&query("checkout flow"), MetricCategory::Usage, now);
        let names: Vec<&str> = series.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"daily_active_users"), "got {names:?}");
    }

    #[test]
    fn focus_term_can_trigger_infra_vocabulary() {
        let q = TopicQuery::new("developer experience", Some("build times")).expect("valid");
        let now = Utc::now();
        let series = SimulatedMetricsProvider::generate(&q, MetricCategory::Performance, now);
        assert!(series.iter().any(|s| s.name == "build_duration"));
    }

    #[test]
    fn series_values_are_deterministic_for_a_topic() {
        let now = Utc::now();
        let a = SimulatedMetricsProvider::generate(&query("checkout flow"), MetricCategory::Conversion, now);
        let b = SimulatedMetricsProvider::generate(&query("checkout flow"), MetricCategory::Conversion, now);
        for (left, right) in a.iter().zip(&b) {
            assert_eq!(left.points, right.points);
        }
    }

    #[test]
    fn different_topics_produce_different_values() {
        let now = Utc::now();
        let a = SimulatedMetricsProvider::generate(&query("checkout flow"), MetricCategory::Usage, now);
        let b = SimulatedMetricsProvider::generate(&query("search ranking"), MetricCategory::Usage, now);
        assert_ne!(a[0].points, b[0].points);
    }

    #[test]
    fn every_series_has_seven_nonnegative_points() {
        let now = Utc::now();
        for category in MetricCategory::ALL {
            for series in
                SimulatedMetricsProvider::generate(&query("checkout flow"), category, now)
            {
                assert_eq!(series.points.len(), 7);
                assert!(series.points.iter().all(|p| p.value >= 0.0));
                assert!(series.simulated);
            }
        }
    }

    #[test]
    fn points_are_ordered_oldest_first() {
        let now = Utc::now();
        let series =
            SimulatedMetricsProvider::generate(&query("checkout flow"), MetricCategory::Usage, now);
        let times: Vec<_> = series[0].points.iter().map(|p| p.timestamp).collect();
        let mut sorted = times.clone();
        sorted.sort();
        assert_eq!(times, sorted);
    }
}
