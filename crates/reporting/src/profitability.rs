//! Per-category profitability: revenue, durations, completion, repeat
//! business, demand share, pricing trend, and the rate recommendation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use pulse_analytics::period;
use pulse_analytics::revenue::earned_revenue;
use pulse_core::{EngineConfig, Project};
use serde::{Deserialize, Serialize};

use crate::categorize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfitability {
    pub category: String,
    pub project_count: usize,
    pub total_revenue: f64,
    pub avg_revenue: f64,
    /// Mean of per-project durations; projects without both dates
    /// contribute the configured default.
    pub avg_duration_days: f64,
    pub revenue_per_day: f64,
    /// Earned milestones over all milestones in the category, as a percentage.
    pub completion_rate_pct: f64,
    /// Clients with more than one project in the category, over all
    /// identified clients in the category, as a percentage.
    pub repeat_business_pct: f64,
    /// Category share of the whole project set, as a percentage.
    pub market_demand_pct: f64,
}

/// Mean total-milestone-price per project among projects created in one
/// calendar month; 0 for empty months.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub month_start: DateTime<Utc>,
    pub avg_project_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateRecommendation {
    /// Mean total milestone price per project across the whole set.
    pub current_avg_rate: f64,
    /// Best category revenue-per-day scaled to a 30-day engagement.
    pub top_performing_rate: f64,
    pub suggested_rate: f64,
    pub potential_increase_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityReport {
    /// Ordered by total revenue, highest first.
    pub categories: Vec<CategoryProfitability>,
    /// Oldest-first fixed-length series.
    pub pricing_trend: Vec<PricePoint>,
    pub recommendation: RateRecommendation,
    /// True when the category table is the fixed sample emitted for an
    /// empty project set, purely so charts are never handed an empty series.
    pub sample_data: bool,
}

/// Fixed sample table for empty input, mirroring the categorizer fallback
/// weights.
fn sample_categories() -> Vec<CategoryProfitability> {
    [("Web Development", 40.0), ("Design & Branding", 30.0), ("Consulting", 30.0)]
        .iter()
        .map(|(name, share)| CategoryProfitability {
            category: (*name).to_string(),
            project_count: 0,
            total_revenue: 0.0,
            avg_revenue: 0.0,
            avg_duration_days: 0.0,
            revenue_per_day: 0.0,
            completion_rate_pct: 0.0,
            repeat_business_pct: 0.0,
            market_demand_pct: *share,
        })
        .collect()
}

fn project_duration_days(project: &Project, config: &EngineConfig) -> f64 {
    match (project.start_date, project.end_date) {
        (Some(start), Some(end)) => ((end - start).num_days().max(0)) as f64,
        _ => config.default_duration_days,
    }
}

fn analyze_category(
    category: &str,
    members: &[&Project],
    total_projects: usize,
    config: &EngineConfig,
) -> CategoryProfitability {
    let project_count = members.len();
    let total_revenue = earned_revenue(members.iter().copied());
    let avg_revenue = total_revenue / project_count.max(1) as f64;

    let avg_duration_days = if members.is_empty() {
        config.default_duration_days
    } else {
        members
            .iter()
            .map(|p| project_duration_days(p, config))
            .sum::<f64>()
            / project_count as f64
    };
    let revenue_per_day = avg_revenue / avg_duration_days.max(1.0);

    let total_milestones: usize = members.iter().map(|p| p.milestones.len()).sum();
    let earned_milestones: usize = members.iter().map(|p| p.earned_milestones()).sum();
    let completion_rate_pct = if total_milestones == 0 {
        0.0
    } else {
        earned_milestones as f64 / total_milestones as f64 * 100.0
    };

    let mut client_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for project in members {
        if let Some(identity) = project.client_identity() {
            *client_counts.entry(identity).or_insert(0) += 1;
        }
    }
    let repeat_business_pct = if client_counts.is_empty() {
        0.0
    } else {
        let repeat = client_counts.values().filter(|&&c| c > 1).count();
        repeat as f64 / client_counts.len() as f64 * 100.0
    };

    CategoryProfitability {
        category: category.to_string(),
        project_count,
        total_revenue,
        avg_revenue,
        avg_duration_days,
        revenue_per_day,
        completion_rate_pct,
        repeat_business_pct,
        market_demand_pct: project_count as f64 / total_projects.max(1) as f64 * 100.0,
    }
}

fn pricing_trend(
    projects: &[Project],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Vec<PricePoint> {
    period::months_back(now, config.trend_window_months)
        .iter()
        .map(|window| {
            let month_projects: Vec<&Project> = projects
                .iter()
                .filter(|p| window.contains(p.created_at))
                .collect();
            let avg_project_price = if month_projects.is_empty() {
                0.0
            } else {
                month_projects
                    .iter()
                    .map(|p| p.total_milestone_value())
                    .sum::<f64>()
                    / month_projects.len() as f64
            };
            PricePoint {
                month_start: window.start,
                avg_project_price,
            }
        })
        .collect()
}

fn recommend_rate(
    projects: &[Project],
    categories: &[CategoryProfitability],
    config: &EngineConfig,
) -> RateRecommendation {
    let current_avg_rate = if projects.is_empty() {
        0.0
    } else {
        projects
            .iter()
            .map(|p| p.total_milestone_value())
            .sum::<f64>()
            / projects.len() as f64
    };
    let top_performing_rate = categories
        .iter()
        .map(|c| c.revenue_per_day)
        .fold(0.0f64, f64::max)
        * 30.0;
    let suggested_rate = (current_avg_rate * config.rate_uplift_factor).min(top_performing_rate);
    let potential_increase_pct = if current_avg_rate > 0.0 {
        ((suggested_rate - current_avg_rate) / current_avg_rate * 100.0).max(0.0)
    } else {
        0.0
    };

    RateRecommendation {
        current_avg_rate,
        top_performing_rate,
        suggested_rate,
        potential_increase_pct,
    }
}

pub fn analyze(
    projects: &[Project],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> ProfitabilityReport {
    let trend = pricing_trend(projects, now, config);

    if projects.is_empty() {
        let categories = sample_categories();
        let recommendation = recommend_rate(projects, &[], config);
        return ProfitabilityReport {
            categories,
            pricing_trend: trend,
            recommendation,
            sample_data: true,
        };
    }

    let mut by_category: BTreeMap<&'static str, Vec<&Project>> = BTreeMap::new();
    for project in projects {
        by_category
            .entry(categorize::categorize(project))
            .or_default()
            .push(project);
    }

    let mut categories: Vec<CategoryProfitability> = by_category
        .iter()
        .map(|(category, members)| analyze_category(category, members, projects.len(), config))
        .collect();
    categories.sort_by(|a, b| {
        b.total_revenue
            .total_cmp(&a.total_revenue)
            .then_with(|| a.category.cmp(&b.category))
    });

    let recommendation = recommend_rate(projects, &categories, config);

    ProfitabilityReport {
        categories,
        pricing_trend: trend,
        recommendation,
        sample_data: false,
    }
}
