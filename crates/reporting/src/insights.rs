//! Insight generation seam. The hosted AI generator lives behind
//! [`InsightGenerator`]; [`LocalInsightGenerator`] is the deterministic
//! fallback used when no external generator is configured.

use pulse_analytics::trend::TrendDirection;
use serde::{Deserialize, Serialize};

use crate::report::AnalyticsReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Revenue,
    Clients,
    Pricing,
    Delivery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub detail: String,
}

pub trait InsightGenerator {
    fn generate_insights(&self, report: &AnalyticsReport) -> Vec<Insight>;
}

/// Rule-based generator: same report in, same insights out.
pub struct LocalInsightGenerator;

impl InsightGenerator for LocalInsightGenerator {
    fn generate_insights(&self, report: &AnalyticsReport) -> Vec<Insight> {
        let mut insights = Vec::new();

        let trend = &report.revenue.trend;
        let (title, detail) = match trend.direction {
            TrendDirection::Up => (
                "Revenue is climbing",
                format!(
                    "Earned revenue is up {:.1}% month over month; the projection for next month is {:.2}.",
                    trend.pct_change, report.revenue.projected_next_month
                ),
            ),
            TrendDirection::Down => (
                "Revenue is slipping",
                format!(
                    "Earned revenue fell {:.1}% against last month.",
                    trend.pct_change.abs()
                ),
            ),
            TrendDirection::Neutral => (
                "Revenue is holding steady",
                format!(
                    "Month-over-month change of {:.1}% sits inside the neutral band.",
                    trend.pct_change
                ),
            ),
        };
        insights.push(Insight {
            kind: InsightKind::Revenue,
            title: title.to_string(),
            detail,
        });

        if report.clients.risk_census.high > 0 {
            insights.push(Insight {
                kind: InsightKind::Clients,
                title: "Clients need attention".to_string(),
                detail: format!(
                    "{} of {} clients are high risk; reach out before they churn.",
                    report.clients.risk_census.high, report.clients.total_clients
                ),
            });
        }

        if let Some(leader) = report.profitability.categories.first() {
            if !report.profitability.sample_data {
                insights.push(Insight {
                    kind: InsightKind::Pricing,
                    title: format!("{} leads on revenue", leader.category),
                    detail: format!(
                        "{} brings in {:.2} per day on average; the suggested rate is {:.2}.",
                        leader.category,
                        leader.revenue_per_day,
                        report.profitability.recommendation.suggested_rate
                    ),
                });
            }
        }

        if report.performance.total_projects > 0 && report.performance.on_time_rate_pct < 50.0 {
            insights.push(Insight {
                kind: InsightKind::Delivery,
                title: "Deadlines are slipping".to_string(),
                detail: format!(
                    "Only {:.0}% of deadline-bearing projects finished on time.",
                    report.performance.on_time_rate_pct
                ),
            });
        }

        insights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::compute_analytics_report;
    use chrono::{TimeZone, Utc};
    use pulse_core::{Milestone, MilestoneStatus, Project};

    #[test]
    fn deterministic_and_nonempty() {
        let created = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        let project = Project {
            id: "p-1".to_string(),
            name: "Website".to_string(),
            brief: String::new(),
            client_email: Some("a@c.test".to_string()),
            client_name: None,
            created_at: created,
            updated_at: created,
            start_date: None,
            end_date: None,
            milestones: vec![Milestone {
                id: "m-1".to_string(),
                project_id: "p-1".to_string(),
                price: 1000.0,
                status: MilestoneStatus::Approved,
                created_at: created,
                updated_at: created,
            }],
        };
        let report = compute_analytics_report(&[project], now, "USD");
        let first = LocalInsightGenerator.generate_insights(&report);
        let second = LocalInsightGenerator.generate_insights(&report);
        assert!(!first.is_empty());
        assert_eq!(first, second);
        assert_eq!(first[0].kind, InsightKind::Revenue);
    }
}
