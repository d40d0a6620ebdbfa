//! Trend classification over metric series.

use crate::provider::{MetricCategory, MetricSeries};

/// Percent-change band outside which a series counts as moving.
const STABLE_BAND_PERCENT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        }
    }
}

/// Summary statistics and direction for one metric series.
#[derive(Debug, Clone)]
pub struct MetricTrend {
    pub name: String,
    pub category: MetricCategory,
    pub first: f64,
    pub last: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub percent_change: f64,
    pub direction: TrendDirection,
}

/// Compute the trend for one series. Returns `None` for an empty series.
///
/// Percent change is first-to-last; a series whose first value is zero has
/// no meaningful baseline and classifies as `Stable` at 0.0.
#[must_use]
pub fn trend_of(series: &MetricSeries) -> Option<MetricTrend> {
    let first = series.points.first()?.value;
    let last = series.points.last()?.value;

    let values: Vec<f64> = series.points.iter().map(|p| p.value).collect();
    #[allow(clippy::cast_precision_loss)]
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let percent_change = if first == 0.0 {
        0.0
    } else {
        (last - first) / first * 100.0
    };

    Some(MetricTrend {
        name: series.name.clone(),
        category: series.category,
        first,
        last,
        mean,
        min,
        max,
        percent_change,
        direction: classify(percent_change),
    })
}

#[must_use]
pub fn classify(percent_change: f64) -> TrendDirection {
    if percent_change > STABLE_BAND_PERCENT {
        TrendDirection::Increasing
    } else if percent_change < -STABLE_BAND_PERCENT {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}
