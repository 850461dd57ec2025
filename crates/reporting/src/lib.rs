//! Report assembly — project categorization, category profitability, insight
//! generation, and the composed analytics report.

pub mod categorize;
pub mod format;
pub mod insights;
pub mod profitability;
pub mod report;

pub use categorize::{CategorySlice, CategorySource};
pub use format::{plain_amount, render_headline, ReportHeadline};
pub use insights::{Insight, InsightGenerator, LocalInsightGenerator};
pub use profitability::ProfitabilityReport;
pub use report::{compute_analytics_report, AnalyticsEngine, AnalyticsReport};
