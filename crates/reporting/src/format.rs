//! Presentation-boundary amount formatting. Currency rendering is an
//! injected collaborator; nothing here participates in numeric computation.

use serde::{Deserialize, Serialize};

use crate::report::AnalyticsReport;

/// Fallback formatter for callers without a currency service.
pub fn plain_amount(amount: f64, currency: &str) -> String {
    format!("{amount:.2} {currency}")
}

/// Headline strings for dashboard cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportHeadline {
    pub this_month_revenue: String,
    pub projected_next_month: String,
    pub average_project_value: String,
}

/// Render the headline figures with the injected
/// `format_amount(amount, currency)` collaborator.
pub fn render_headline(
    report: &AnalyticsReport,
    format_amount: impl Fn(f64, &str) -> String,
) -> ReportHeadline {
    let currency = report.currency.as_str();
    ReportHeadline {
        this_month_revenue: format_amount(report.revenue.this_month, currency),
        projected_next_month: format_amount(report.revenue.projected_next_month, currency),
        average_project_value: format_amount(report.revenue.average_project_value, currency),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::compute_analytics_report;
    use chrono::{TimeZone, Utc};

    #[test]
    fn injected_formatter_is_applied_verbatim() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        let report = compute_analytics_report(&[], now, "EUR");
        let headline = render_headline(&report, |amount, currency| {
            format!("{currency} {amount:.0}")
        });
        assert_eq!(headline.this_month_revenue, "EUR 0");
    }

    #[test]
    fn plain_formatter_renders_two_decimals() {
        assert_eq!(plain_amount(1234.5, "USD"), "1234.50 USD");
    }
}
