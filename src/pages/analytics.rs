//! Analytics overview.
//!
//! The backend exposes no analytics endpoint, so the page shows a fixed
//! sample snapshot and says so.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Flat,
}

impl Trend {
    pub fn css_class(&self) -> &'static str {
        match self {
            Trend::Up => "metric-change positive",
            Trend::Flat => "metric-change neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub title: &'static str,
    pub value: &'static str,
    pub change: &'static str,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub icon: &'static str,
    pub title: &'static str,
    pub detail: &'static str,
    pub when: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub title: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsSnapshot {
    /// True when the figures are not backed by real data.
    pub sample: bool,
    pub metrics: Vec<Metric>,
    pub activity: Vec<Activity>,
    pub insights: Vec<Insight>,
}

impl AnalyticsSnapshot {
    pub fn placeholder() -> Self {
        Self {
            sample: true,
            metrics: vec![
                Metric {
                    title: "Total Routes Optimized",
                    value: "127",
                    change: "+12% this month",
                    trend: Trend::Up,
                },
                Metric {
                    title: "Average Efficiency",
                    value: "94.2%",
                    change: "+2.1% this month",
                    trend: Trend::Up,
                },
                Metric {
                    title: "Fuel Savings",
                    value: "£2,341",
                    change: "+8.3% this month",
                    trend: Trend::Up,
                },
                Metric {
                    title: "Situations Handled",
                    value: "89",
                    change: "Same as last month",
                    trend: Trend::Flat,
                },
            ],
            activity: vec![
                Activity {
                    icon: "🚛",
                    title: "Route Optimized",
                    detail: "3 vehicles, 15 deliveries - Trip ID: abc123ef",
                    when: "2 hours ago",
                },
                Activity {
                    icon: "⛽",
                    title: "Fuel Situation Handled",
                    detail: "Vehicle V2 near customer C079 - Recommended nearest station",
                    when: "4 hours ago",
                },
                Activity {
                    icon: "📦",
                    title: "Orders Extracted",
                    detail: "25 new orders converted to nodes for optimization",
                    when: "6 hours ago",
                },
                Activity {
                    icon: "😴",
                    title: "Fatigue Management",
                    detail: "Driver rest recommendations provided for Vehicle V1",
                    when: "1 day ago",
                },
            ],
            insights: vec![
                Insight {
                    title: "Optimization Tip",
                    body: "Routes tend to be more efficient with eco-mode preferences enabled.",
                },
                Insight {
                    title: "Geographic Pattern",
                    body: "Most fuel situations occur in the Northwest region.",
                },
                Insight {
                    title: "Peak Times",
                    body: "Route optimizations are most requested between 9-11 AM.",
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_flagged_as_sample() {
        let snap = AnalyticsSnapshot::placeholder();
        assert!(snap.sample);
        assert_eq!(snap.metrics.len(), 4);
        assert_eq!(snap.metrics[0].value, "127");
        assert_eq!(snap.metrics[3].trend.css_class(), "metric-change neutral");
    }
}
