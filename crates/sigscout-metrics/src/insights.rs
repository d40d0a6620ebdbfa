//! Recommendations derived from metric trends.

use crate::trends::{MetricTrend, TrendDirection};

/// One-line recommendation for a trend.
#[must_use]
pub fn recommendation(trend: &MetricTrend) -> String {
    match trend.direction {
        TrendDirection::Increasing => format!(
            "{} is up {:.1}% over the window; capitalize on growth by expanding what is driving it",
            trend.name, trend.percent_change
        ),
        TrendDirection::Decreasing => format!(
            "{} is down {:.1}% over the window; investigate decline before it compounds",
            trend.name,
            trend.percent_change.abs()
        ),
        TrendDirection::Stable => format!(
            "{} is holding steady ({:+.1}%); keep monitoring",
            trend.name, trend.percent_change
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MetricCategory;

    fn trend(direction: TrendDirection, percent_change: f64) -> MetricTrend {
        MetricTrend {
            name: "daily_active_users".to_string(),
            category: MetricCategory::Usage,
            first: 100.0,
            last: 100.0 + percent_change,
            mean: 100.0,
            min: 100.0,
            max: 100.0 + percent_change.abs(),
            percent_change,
            direction,
        }
    }

    #[test]
    fn increasing_trends_recommend_capitalizing() {
        let text = recommendation(&trend(TrendDirection::Increasing, 18.2));
        assert!(text.contains("capitalize on growth"), "got {text}");
        assert!(text.contains("18.2"));
    }

    #[test]
    fn decreasing_trends_recommend_investigation() {
        let text = recommendation(&trend(TrendDirection::Decreasing, -12.0));
        assert!(text.contains("investigate decline"), "got {text}");
        assert!(text.contains("12.0"));
    }

    #[test]
    fn stable_trends_recommend_monitoring() {
        let text = recommendation(&trend(TrendDirection::Stable, 1.3));
        assert!(text.contains("monitoring"), "got {text}");
    }
}
