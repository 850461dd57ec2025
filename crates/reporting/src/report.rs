//! Report assembly. Pure composition of the component aggregators over one
//! input snapshot and one evaluation instant; assembly order carries no
//! meaning.

use chrono::{DateTime, Utc};
use pulse_analytics::{performance, revenue, PerformanceSummary, RevenueSummary};
use pulse_core::{EngineConfig, Project};
use pulse_segmentation::clients::{self, ClientSegmentationReport};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::categorize::{self, CategorySlice};
use crate::profitability::{self, ProfitabilityReport};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// The evaluation instant the report was computed against.
    pub generated_at: DateTime<Utc>,
    pub currency: String,
    pub revenue: RevenueSummary,
    pub performance: PerformanceSummary,
    pub clients: ClientSegmentationReport,
    pub categories: Vec<CategorySlice>,
    pub profitability: ProfitabilityReport,
}

/// Analytics engine — stateless computation over the project snapshot.
pub struct AnalyticsEngine {
    config: EngineConfig,
}

impl AnalyticsEngine {
    pub fn new(config: &EngineConfig) -> Self {
        info!(
            neutral_band = config.trend_neutral_band_pct,
            completion_threshold = config.completion_threshold,
            trend_window = config.trend_window_months,
            "Analytics engine initialized"
        );
        Self {
            config: config.clone(),
        }
    }

    /// Compute the full report for one snapshot and evaluation instant.
    pub fn report(
        &self,
        projects: &[Project],
        now: DateTime<Utc>,
        currency: &str,
    ) -> AnalyticsReport {
        let report = AnalyticsReport {
            generated_at: now,
            currency: currency.to_string(),
            revenue: revenue::summarize(projects, now, &self.config),
            performance: performance::summarize(projects, now, &self.config),
            clients: clients::segment_clients(projects, now, &self.config),
            categories: categorize::category_distribution(projects),
            profitability: profitability::analyze(projects, now, &self.config),
        };

        metrics::counter!("analytics.reports_computed").increment(1);
        debug!(
            projects = projects.len(),
            clients = report.clients.total_clients,
            currency,
            "Analytics report assembled"
        );

        report
    }

    /// Client segmentation alone, for callers that only need cohorts.
    pub fn client_segments(
        &self,
        projects: &[Project],
        now: DateTime<Utc>,
    ) -> ClientSegmentationReport {
        clients::segment_clients(projects, now, &self.config)
    }

    /// Category profitability alone.
    pub fn profitability(
        &self,
        projects: &[Project],
        now: DateTime<Utc>,
    ) -> ProfitabilityReport {
        profitability::analyze(projects, now, &self.config)
    }
}

/// Full report with default configuration.
pub fn compute_analytics_report(
    projects: &[Project],
    now: DateTime<Utc>,
    currency: &str,
) -> AnalyticsReport {
    AnalyticsEngine::new(&EngineConfig::default()).report(projects, now, currency)
}
