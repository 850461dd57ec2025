//! Earned-revenue aggregation over arbitrary project subsets, plus the
//! month-bucketed revenue summary consumed by the report assembler.

use chrono::{DateTime, Utc};
use pulse_core::{EngineConfig, Project};
use serde::{Deserialize, Serialize};

use crate::period::{self, MonthWindow};
use crate::trend::{self, Trend};

/// Sum of milestone prices with an earned status across all milestones of
/// the given projects. This is the one definition of realized revenue;
/// client lifetime value and category profitability reuse it.
pub fn earned_revenue<'a, I>(projects: I) -> f64
where
    I: IntoIterator<Item = &'a Project>,
{
    projects.into_iter().map(|p| p.earned_value()).sum()
}

/// Earned revenue per project, guarded against an empty subset.
pub fn average_project_value(projects: &[Project]) -> f64 {
    earned_revenue(projects) / projects.len().max(1) as f64
}

/// Linear projection of the next period from the current one. Without a
/// positive prior baseline there is nothing to extrapolate from, so the
/// current value is returned unchanged.
pub fn projected_next_period(current: f64, prior: f64) -> f64 {
    if prior > 0.0 {
        let pct_change = (current - prior) / prior * 100.0;
        current * (1.0 + pct_change / 100.0)
    } else {
        current
    }
}

/// One month of the fixed-length revenue series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenuePoint {
    pub month_start: DateTime<Utc>,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub this_month: f64,
    pub last_month: f64,
    pub trend: Trend,
    pub average_project_value: f64,
    pub projected_next_month: f64,
    /// Oldest-first, `trend_window_months` long, current month last.
    pub monthly: Vec<MonthlyRevenuePoint>,
}

fn revenue_in_window(projects: &[Project], window: &MonthWindow) -> f64 {
    earned_revenue(
        projects
            .iter()
            .filter(|p| window.contains(p.created_at)),
    )
}

/// Month-bucketed revenue summary. Projects are bucketed by `created_at`.
pub fn summarize(projects: &[Project], now: DateTime<Utc>, config: &EngineConfig) -> RevenueSummary {
    let this_month = revenue_in_window(projects, &period::this_month(now));
    let last_month = revenue_in_window(projects, &period::last_month(now));

    let monthly = period::months_back(now, config.trend_window_months)
        .iter()
        .map(|w| MonthlyRevenuePoint {
            month_start: w.start,
            revenue: revenue_in_window(projects, w),
        })
        .collect();

    RevenueSummary {
        this_month,
        last_month,
        trend: trend::classify(this_month, last_month, config.trend_neutral_band_pct),
        average_project_value: average_project_value(projects),
        projected_next_month: projected_next_period(this_month, last_month),
        monthly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pulse_core::{Milestone, MilestoneStatus};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
    }

    fn project(created: DateTime<Utc>, milestones: Vec<(f64, MilestoneStatus)>) -> Project {
        let id = uuid::Uuid::new_v4().to_string();
        let milestones = milestones
            .into_iter()
            .map(|(price, status)| Milestone {
                id: uuid::Uuid::new_v4().to_string(),
                project_id: id.clone(),
                price,
                status,
                created_at: created,
                updated_at: created,
            })
            .collect();
        Project {
            id,
            name: "Project".to_string(),
            brief: String::new(),
            client_email: None,
            client_name: None,
            created_at: created,
            updated_at: created,
            start_date: None,
            end_date: None,
            milestones,
        }
    }

    #[test]
    fn earned_revenue_counts_each_earned_milestone_once() {
        let projects = vec![
            project(
                at(2024, 3, 5),
                vec![
                    (1000.0, MilestoneStatus::Approved),
                    (400.0, MilestoneStatus::Pending),
                ],
            ),
            project(at(2024, 3, 6), vec![(600.0, MilestoneStatus::PaymentSubmitted)]),
        ];
        assert_eq!(earned_revenue(&projects), 1600.0);
    }

    #[test]
    fn average_project_value_guards_empty_input() {
        assert_eq!(average_project_value(&[]), 0.0);
    }

    #[test]
    fn projection_without_baseline_is_unchanged() {
        assert_eq!(projected_next_period(800.0, 0.0), 800.0);
    }

    #[test]
    fn projection_extends_the_observed_change() {
        // +50% month over month projects another +50%.
        assert_eq!(projected_next_period(1500.0, 1000.0), 2250.0);
    }

    #[test]
    fn summary_buckets_by_creation_month() {
        let now = at(2024, 3, 15);
        let projects = vec![
            project(at(2024, 3, 2), vec![(1000.0, MilestoneStatus::Approved)]),
            project(at(2024, 2, 20), vec![(500.0, MilestoneStatus::Approved)]),
            project(at(2023, 11, 1), vec![(9999.0, MilestoneStatus::Pending)]),
        ];
        let summary = summarize(&projects, now, &EngineConfig::default());
        assert_eq!(summary.this_month, 1000.0);
        assert_eq!(summary.last_month, 500.0);
        assert_eq!(summary.monthly.len(), 6);
        assert_eq!(summary.monthly[5].revenue, 1000.0);
        assert_eq!(summary.monthly[4].revenue, 500.0);
        // Pending milestones never contribute.
        assert_eq!(summary.monthly[0].revenue, 0.0);
        // +100% month over month doubles the projection.
        assert_eq!(summary.projected_next_month, 2000.0);
    }
}
