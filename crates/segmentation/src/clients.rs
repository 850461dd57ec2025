//! Per-client profiles and cohort evaluation.
//!
//! Cohorts are independent predicates: a client appears in every cohort it
//! satisfies, possibly none. Downstream "pick one" presentation is a UI
//! decision, not made here.

use std::collections::BTreeMap;

use chrono::{DateTime, Months, Utc};
use pulse_analytics::revenue::earned_revenue;
use pulse_core::{EngineConfig, Project};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthTrend {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    /// `client_email` when present, otherwise `client_name`.
    pub identity: String,
    pub total_projects: usize,
    pub lifetime_value: f64,
    pub avg_project_value: f64,
    /// Earned milestones over all milestones, as a percentage.
    pub payment_reliability_pct: f64,
    /// Whole 30-day blocks between first and last project, at least 1.
    pub collaboration_months: i64,
    pub growth_trend: GrowthTrend,
    pub risk: RiskTier,
    /// 100 for repeat clients, 0 otherwise. A binary signal at the
    /// per-client level, not a true rate.
    pub retention_flag: u32,
    pub first_project_at: DateTime<Utc>,
    pub last_project_at: DateTime<Utc>,
}

/// The five named cohorts, each an independent predicate over a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientSegment {
    Champion,
    Growing,
    Stable,
    AtRisk,
    OneTime,
}

impl ClientSegment {
    pub const ALL: [ClientSegment; 5] = [
        ClientSegment::Champion,
        ClientSegment::Growing,
        ClientSegment::Stable,
        ClientSegment::AtRisk,
        ClientSegment::OneTime,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ClientSegment::Champion => "champion",
            ClientSegment::Growing => "growing",
            ClientSegment::Stable => "stable",
            ClientSegment::AtRisk => "at-risk",
            ClientSegment::OneTime => "one-time",
        }
    }

    pub fn matches(&self, profile: &ClientProfile, config: &EngineConfig) -> bool {
        match self {
            ClientSegment::Champion => {
                profile.lifetime_value > config.champion_value_floor
                    && profile.total_projects >= config.champion_min_projects
                    && profile.risk == RiskTier::Low
            }
            ClientSegment::Growing => {
                profile.growth_trend == GrowthTrend::Increasing && profile.total_projects >= 2
            }
            ClientSegment::Stable => {
                profile.total_projects >= 2
                    && profile.growth_trend == GrowthTrend::Stable
                    && profile.risk == RiskTier::Low
            }
            ClientSegment::AtRisk => {
                profile.risk == RiskTier::High || profile.growth_trend == GrowthTrend::Decreasing
            }
            ClientSegment::OneTime => profile.total_projects == 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub segment: ClientSegment,
    pub client_count: usize,
    pub total_value: f64,
    /// 0 when the cohort is empty.
    pub avg_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskCensus {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSegmentationReport {
    pub total_clients: usize,
    pub repeat_clients: usize,
    pub retention_rate_pct: f64,
    pub avg_collaboration_months: f64,
    pub risk_census: RiskCensus,
    /// One summary per named cohort, always all five.
    pub segments: Vec<SegmentSummary>,
    /// Top clients by lifetime value, at most 10.
    pub top_clients: Vec<ClientProfile>,
}

fn mean_total_price(projects: &[&Project]) -> f64 {
    if projects.is_empty() {
        return 0.0;
    }
    projects
        .iter()
        .map(|p| p.total_milestone_value())
        .sum::<f64>()
        / projects.len() as f64
}

fn growth_trend(projects: &[&Project], now: DateTime<Utc>, config: &EngineConfig) -> GrowthTrend {
    let cutoff = now
        .checked_sub_months(Months::new(config.growth_window_months))
        .unwrap_or(now);
    let (recent, older): (Vec<&Project>, Vec<&Project>) = projects
        .iter()
        .copied()
        .partition(|p| p.created_at >= cutoff);
    if recent.is_empty() || older.is_empty() {
        return GrowthTrend::Stable;
    }
    let recent_mean = mean_total_price(&recent);
    let older_mean = mean_total_price(&older);
    if recent_mean > older_mean * config.growth_increase_factor {
        GrowthTrend::Increasing
    } else if recent_mean < older_mean * config.growth_decrease_factor {
        GrowthTrend::Decreasing
    } else {
        GrowthTrend::Stable
    }
}

fn risk_tier(
    last_project_at: DateTime<Utc>,
    payment_reliability_pct: f64,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> RiskTier {
    let days_since_last = (now - last_project_at).num_days();
    if days_since_last > config.dormancy_high_days
        || payment_reliability_pct < config.reliability_high_floor_pct
    {
        RiskTier::High
    } else if days_since_last > config.dormancy_medium_days
        || payment_reliability_pct < config.reliability_medium_floor_pct
    {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

fn profile_client(
    identity: &str,
    projects: &[&Project],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> ClientProfile {
    let lifetime_value = earned_revenue(projects.iter().copied());
    let total_projects = projects.len();
    let avg_project_value = lifetime_value / total_projects.max(1) as f64;

    let total_milestones: usize = projects.iter().map(|p| p.milestones.len()).sum();
    let earned_milestones: usize = projects.iter().map(|p| p.earned_milestones()).sum();
    let payment_reliability_pct = if total_milestones == 0 {
        0.0
    } else {
        earned_milestones as f64 / total_milestones as f64 * 100.0
    };

    let first_project_at = projects
        .iter()
        .map(|p| p.created_at)
        .min()
        .unwrap_or(now);
    let last_project_at = projects
        .iter()
        .map(|p| p.created_at)
        .max()
        .unwrap_or(now);
    let span_days = (last_project_at - first_project_at).num_days().max(0);
    let collaboration_months = ((span_days as f64 / 30.0).ceil() as i64).max(1);

    ClientProfile {
        identity: identity.to_string(),
        total_projects,
        lifetime_value,
        avg_project_value,
        payment_reliability_pct,
        collaboration_months,
        growth_trend: growth_trend(projects, now, config),
        risk: risk_tier(last_project_at, payment_reliability_pct, now, config),
        retention_flag: if total_projects > 1 { 100 } else { 0 },
        first_project_at,
        last_project_at,
    }
}

/// Group projects by client identity and evaluate every cohort predicate.
/// Projects without any client identity are skipped here; they still count
/// in global and category aggregates elsewhere.
pub fn segment_clients(
    projects: &[Project],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> ClientSegmentationReport {
    let mut by_client: BTreeMap<&str, Vec<&Project>> = BTreeMap::new();
    for project in projects {
        if let Some(identity) = project.client_identity() {
            by_client.entry(identity).or_default().push(project);
        }
    }

    let profiles: Vec<ClientProfile> = by_client
        .iter()
        .map(|(identity, group)| profile_client(identity, group, now, config))
        .collect();

    debug!(clients = profiles.len(), "Client profiles computed");

    let total_clients = profiles.len();
    let repeat_clients = profiles.iter().filter(|p| p.total_projects > 1).count();
    let retention_rate_pct = if total_clients == 0 {
        0.0
    } else {
        repeat_clients as f64 / total_clients as f64 * 100.0
    };
    let avg_collaboration_months = if total_clients == 0 {
        0.0
    } else {
        profiles
            .iter()
            .map(|p| p.collaboration_months as f64)
            .sum::<f64>()
            / total_clients as f64
    };

    let mut risk_census = RiskCensus::default();
    for profile in &profiles {
        match profile.risk {
            RiskTier::High => risk_census.high += 1,
            RiskTier::Medium => risk_census.medium += 1,
            RiskTier::Low => risk_census.low += 1,
        }
    }

    let segments = ClientSegment::ALL
        .iter()
        .map(|segment| {
            let members: Vec<&ClientProfile> = profiles
                .iter()
                .filter(|p| segment.matches(p, config))
                .collect();
            let total_value: f64 = members.iter().map(|p| p.lifetime_value).sum();
            SegmentSummary {
                segment: *segment,
                client_count: members.len(),
                total_value,
                avg_value: if members.is_empty() {
                    0.0
                } else {
                    total_value / members.len() as f64
                },
            }
        })
        .collect();

    let mut top_clients = profiles;
    top_clients.sort_by(|a, b| {
        b.lifetime_value
            .total_cmp(&a.lifetime_value)
            .then_with(|| a.identity.cmp(&b.identity))
    });
    top_clients.truncate(10);

    ClientSegmentationReport {
        total_clients,
        repeat_clients,
        retention_rate_pct,
        avg_collaboration_months,
        risk_census,
        segments,
        top_clients,
    }
}
