//! Time and delivery-performance aggregation: active/completed
//! classification, durations, on-time rate, and the composite
//! productivity score.
//!
//! Active and completed are independent predicates, not a two-state enum.
//! A project with no `end_date`, a pending milestone, and ≥70% earned
//! milestones satisfies both; dashboard consumers rely on seeing every
//! matching label.

use chrono::{DateTime, Duration, Utc};
use pulse_core::{EngineConfig, MilestoneStatus, Project};
use serde::{Deserialize, Serialize};

use crate::period;
use crate::trend::{self, Trend};

/// A project with no milestones yet is active while it is newer than the
/// recency window; one with milestones is active while any milestone is
/// still pending or awaiting payment, or while fewer than the completion
/// threshold of its milestones are earned.
pub fn is_active(project: &Project, now: DateTime<Utc>, config: &EngineConfig) -> bool {
    if project.milestones.is_empty() {
        return now - project.created_at <= Duration::days(config.recent_project_window_days);
    }
    let has_open_milestone = project.milestones.iter().any(|m| {
        matches!(
            m.status,
            MilestoneStatus::Pending | MilestoneStatus::PaymentSubmitted
        )
    });
    has_open_milestone || project.earned_fraction() < config.completion_threshold
}

/// Completed when at least the threshold fraction of milestones is earned,
/// or the deadline has passed.
pub fn is_completed(project: &Project, now: DateTime<Utc>, config: &EngineConfig) -> bool {
    let majority_earned = !project.milestones.is_empty()
        && project.earned_fraction() >= config.completion_threshold;
    let past_deadline = project.end_date.map(|end| end < now).unwrap_or(false);
    majority_earned || past_deadline
}

/// Duration of a project in whole days, rounded up. Falls back to
/// `updated_at`/`created_at` when explicit dates are missing.
pub fn duration_days(project: &Project) -> i64 {
    let start = project.start_date.unwrap_or(project.created_at);
    let end = project.end_date.unwrap_or(project.updated_at);
    let seconds = (end - start).num_seconds().max(0);
    (seconds as f64 / 86_400.0).ceil() as i64
}

/// Earned milestones as a percentage of all milestones across the subset;
/// 0 when there are no milestones anywhere.
pub fn success_rate(projects: &[Project]) -> f64 {
    let total: usize = projects.iter().map(|p| p.milestones.len()).sum();
    if total == 0 {
        return 0.0;
    }
    let earned: usize = projects.iter().map(|p| p.earned_milestones()).sum();
    earned as f64 / total as f64 * 100.0
}

/// Fraction of deadline-bearing projects whose last activity landed on or
/// before the deadline. Projects without an `end_date` are excluded from
/// the denominator entirely.
pub fn on_time_rate(projects: &[Project]) -> f64 {
    let with_deadline: Vec<&Project> =
        projects.iter().filter(|p| p.end_date.is_some()).collect();
    if with_deadline.is_empty() {
        return 0.0;
    }
    let on_time = with_deadline
        .iter()
        .filter(|p| match p.end_date {
            Some(deadline) => p.last_activity() <= deadline,
            None => false,
        })
        .count();
    on_time as f64 / with_deadline.len() as f64 * 100.0
}

fn rejection_rate(projects: &[Project]) -> f64 {
    let total: usize = projects.iter().map(|p| p.milestones.len()).sum();
    if total == 0 {
        return 0.0;
    }
    let rejected: usize = projects
        .iter()
        .flat_map(|p| &p.milestones)
        .filter(|m| m.status == MilestoneStatus::Rejected)
        .count();
    rejected as f64 / total as f64 * 100.0
}

fn repeat_client_fraction(projects: &[Project]) -> f64 {
    let mut counts = std::collections::BTreeMap::new();
    for p in projects {
        if let Some(identity) = p.client_identity() {
            *counts.entry(identity).or_insert(0usize) += 1;
        }
    }
    if counts.is_empty() {
        return 0.0;
    }
    let repeat = counts.values().filter(|&&c| c > 1).count();
    repeat as f64 / counts.len() as f64
}

/// Satisfaction proxy: start from a perfect score, subtract the rejection
/// rate, add up to 10 points for repeat business, clamp to [0, 100].
pub fn client_satisfaction(projects: &[Project]) -> f64 {
    let score = 100.0 - rejection_rate(projects) + repeat_client_fraction(projects) * 10.0;
    score.clamp(0.0, 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub total_projects: usize,
    pub active_projects: usize,
    pub completed_projects: usize,
    /// Mean ceil-day duration over completed projects; 0 when none completed.
    pub avg_duration_days: f64,
    pub on_time_rate_pct: f64,
    pub success_rate_pct: f64,
    pub client_satisfaction_pct: f64,
    /// Rounded mean of success rate, on-time rate, and satisfaction.
    pub productivity_score: u32,
    /// Success rate of this month's projects against last month's.
    pub success_trend: Trend,
}

pub fn summarize(
    projects: &[Project],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> PerformanceSummary {
    let active_projects = projects
        .iter()
        .filter(|p| is_active(p, now, config))
        .count();
    let completed: Vec<&Project> = projects
        .iter()
        .filter(|p| is_completed(p, now, config))
        .collect();

    let avg_duration_days = if completed.is_empty() {
        0.0
    } else {
        completed.iter().map(|p| duration_days(p) as f64).sum::<f64>() / completed.len() as f64
    };

    let success = success_rate(projects);
    let on_time = on_time_rate(projects);
    let satisfaction = client_satisfaction(projects);
    let productivity = ((success + on_time + satisfaction) / 3.0)
        .round()
        .clamp(0.0, 100.0) as u32;

    let this_window = period::this_month(now);
    let last_window = period::last_month(now);
    let this_cohort: Vec<Project> = projects
        .iter()
        .filter(|p| this_window.contains(p.created_at))
        .cloned()
        .collect();
    let last_cohort: Vec<Project> = projects
        .iter()
        .filter(|p| last_window.contains(p.created_at))
        .cloned()
        .collect();
    let success_trend = trend::classify(
        success_rate(&this_cohort),
        success_rate(&last_cohort),
        config.trend_neutral_band_pct,
    );

    PerformanceSummary {
        total_projects: projects.len(),
        active_projects,
        completed_projects: completed.len(),
        avg_duration_days,
        on_time_rate_pct: on_time,
        success_rate_pct: success,
        client_satisfaction_pct: satisfaction,
        productivity_score: productivity,
        success_trend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pulse_core::Milestone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn milestone(price: f64, status: MilestoneStatus, updated: DateTime<Utc>) -> Milestone {
        Milestone {
            id: uuid::Uuid::new_v4().to_string(),
            project_id: "p".to_string(),
            price,
            status,
            created_at: updated,
            updated_at: updated,
        }
    }

    fn project(created: DateTime<Utc>, milestones: Vec<Milestone>) -> Project {
        Project {
            id: uuid::Uuid::new_v4().to_string(),
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
    fn fresh_empty_project_is_active() {
        let now = at(2024, 3, 20);
        let cfg = EngineConfig::default();
        assert!(is_active(&project(at(2024, 3, 1), vec![]), now, &cfg));
        assert!(!is_active(&project(at(2023, 12, 1), vec![]), now, &cfg));
    }

    #[test]
    fn pending_milestone_keeps_project_active() {
        let now = at(2024, 3, 20);
        let cfg = EngineConfig::default();
        let created = at(2023, 10, 1);
        let p = project(
            created,
            vec![
                milestone(100.0, MilestoneStatus::Approved, created),
                milestone(100.0, MilestoneStatus::Pending, created),
            ],
        );
        assert!(is_active(&p, now, &cfg));
    }

    #[test]
    fn active_and_completed_can_overlap() {
        let now = at(2024, 3, 20);
        let cfg = EngineConfig::default();
        let created = at(2024, 1, 1);
        // 3 of 4 earned (75% ≥ 70%) but one still pending, no end_date.
        let p = project(
            created,
            vec![
                milestone(100.0, MilestoneStatus::Approved, created),
                milestone(100.0, MilestoneStatus::Approved, created),
                milestone(100.0, MilestoneStatus::PaymentSubmitted, created),
                milestone(100.0, MilestoneStatus::Pending, created),
            ],
        );
        assert!(is_active(&p, now, &cfg));
        assert!(is_completed(&p, now, &cfg));
    }

    #[test]
    fn past_deadline_counts_as_completed() {
        let now = at(2024, 3, 20);
        let cfg = EngineConfig::default();
        let mut p = project(at(2024, 1, 1), vec![]);
        p.end_date = Some(at(2024, 2, 1));
        assert!(is_completed(&p, now, &cfg));
    }

    #[test]
    fn duration_rounds_partial_days_up() {
        let mut p = project(at(2024, 1, 1), vec![]);
        p.start_date = Some(at(2024, 1, 1));
        p.end_date = Some(at(2024, 1, 11)); // same wall time, exactly 10 days
        assert_eq!(duration_days(&p), 10);
        p.end_date = Some(Utc.with_ymd_and_hms(2024, 1, 11, 13, 0, 0).unwrap());
        assert_eq!(duration_days(&p), 11);
    }

    #[test]
    fn on_time_excludes_projects_without_deadline() {
        let created = at(2024, 1, 1);
        let no_deadline = project(created, vec![]);
        let mut late = project(created, vec![]);
        late.end_date = Some(at(2024, 2, 1));
        late.milestones = vec![milestone(100.0, MilestoneStatus::Approved, at(2024, 2, 5))];
        let mut prompt = project(created, vec![]);
        prompt.end_date = Some(at(2024, 2, 1));
        prompt.milestones = vec![milestone(100.0, MilestoneStatus::Approved, at(2024, 1, 20))];

        let rate = on_time_rate(&[no_deadline, late, prompt]);
        // 1 of 2 deadline-bearing projects; the deadline-less one is out of
        // both numerator and denominator.
        assert_eq!(rate, 50.0);
    }

    #[test]
    fn success_rate_zero_without_milestones() {
        assert_eq!(success_rate(&[project(at(2024, 1, 1), vec![])]), 0.0);
    }

    #[test]
    fn satisfaction_stays_within_bounds() {
        let created = at(2024, 1, 1);
        let all_rejected = project(
            created,
            vec![
                milestone(100.0, MilestoneStatus::Rejected, created),
                milestone(100.0, MilestoneStatus::Rejected, created),
            ],
        );
        let score = client_satisfaction(&[all_rejected]);
        assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn summary_scores_single_earned_project() {
        let now = at(2024, 3, 20);
        let created = at(2024, 3, 5);
        let p = project(
            created,
            vec![milestone(1000.0, MilestoneStatus::Approved, created)],
        );
        let summary = summarize(&[p], now, &EngineConfig::default());
        assert_eq!(summary.success_rate_pct, 100.0);
        assert_eq!(summary.completed_projects, 1);
        assert!(summary.productivity_score <= 100);
    }
}
