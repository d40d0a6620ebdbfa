//! Product metrics collector for sigscout.
//!
//! Fetches the fixed metric categories (usage, performance, engagement,
//! conversion) from a pluggable provider, classifies per-metric trends,
//! and turns them into ranked signals. Custom HTTP endpoints and the
//! analytics platform contribute additional metrics when configured.

pub mod collector;
pub mod endpoints;
pub mod insights;
pub mod provider;
pub mod trends;

mod error;

pub use collector::MetricsCollector;
pub use error::MetricsError;
pub use provider::{MetricCategory, MetricSeries, MetricsProvider, SimulatedMetricsProvider};
pub use trends::{MetricTrend, TrendDirection};
