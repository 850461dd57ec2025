//! Keyword-based project categorization.
//!
//! Rules are evaluated top to bottom over the lowercased concatenation of
//! `name` and `brief`; the first matching rule wins. When no project in the
//! whole set matches any rule, a fixed proportional split is emitted instead
//! of an empty series so chart consumers always have data. Fallback slices
//! carry their own [`CategorySource`] so they are never mistaken for real
//! classifications.

use pulse_core::Project;
use serde::{Deserialize, Serialize};

/// Ordered first-match-wins rules. `app` intentionally sits after `web`, so
/// "web app" classifies as Web Development.
pub const CATEGORY_RULES: &[(&str, &[&str])] = &[
    ("Web Development", &["web", "website", "landing"]),
    ("Mobile App", &["app", "mobile", "ios", "android"]),
    ("Design & Branding", &["design", "ui", "ux", "logo", "brand"]),
    ("Marketing", &["marketing", "seo", "social", "content"]),
    ("Data & Analytics", &["data", "analytics", "dashboard", "report"]),
    ("E-commerce", &["ecommerce", "shop", "store"]),
    ("Backend Development", &["api", "backend", "database", "server"]),
    ("Consulting", &["consult", "strategy", "advice"]),
];

pub const OTHER_CATEGORY: &str = "Other";

/// Proportional split used when keyword matching finds nothing at all.
const FALLBACK_SPLIT: &[(&str, f64)] = &[
    ("Web Development", 0.4),
    ("Design & Branding", 0.3),
    ("Consulting", 0.3),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySource {
    /// Genuine keyword match.
    Keyword,
    /// Presentation-safety fallback; not a real classification.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySlice {
    pub name: String,
    /// Project count; fractional for fallback slices, which split the input
    /// count proportionally.
    pub count: f64,
    pub share_pct: f64,
    pub source: CategorySource,
}

/// Category of a single project, `Other` when nothing matches.
pub fn categorize(project: &Project) -> &'static str {
    let text = format!("{} {}", project.name, project.brief).to_lowercase();
    for (category, keywords) in CATEGORY_RULES {
        if keywords.iter().any(|k| text.contains(k)) {
            return category;
        }
    }
    OTHER_CATEGORY
}

/// Distribution of the whole project set across categories. Guaranteed
/// non-empty for non-empty input: if no project matched a keyword rule the
/// fixed proportional split covers 100% of the input count with strictly
/// positive values.
pub fn category_distribution(projects: &[Project]) -> Vec<CategorySlice> {
    let total = projects.len();
    let mut counts: Vec<(&'static str, usize)> = CATEGORY_RULES
        .iter()
        .map(|(name, _)| (*name, 0usize))
        .collect();
    counts.push((OTHER_CATEGORY, 0));

    let mut any_keyword_match = false;
    for project in projects {
        let category = categorize(project);
        if category != OTHER_CATEGORY {
            any_keyword_match = true;
        }
        if let Some(entry) = counts.iter_mut().find(|(name, _)| *name == category) {
            entry.1 += 1;
        }
    }

    if !any_keyword_match {
        return FALLBACK_SPLIT
            .iter()
            .map(|(name, weight)| CategorySlice {
                name: (*name).to_string(),
                count: total as f64 * weight,
                share_pct: weight * 100.0,
                source: CategorySource::Fallback,
            })
            .collect();
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(name, count)| CategorySlice {
            name: name.to_string(),
            count: count as f64,
            share_pct: count as f64 / total.max(1) as f64 * 100.0,
            source: CategorySource::Keyword,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn project(name: &str, brief: &str) -> Project {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        Project {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            brief: brief.to_string(),
            client_email: None,
            client_name: None,
            created_at: at,
            updated_at: at,
            start_date: None,
            end_date: None,
            milestones: vec![],
        }
    }

    #[test]
    fn first_matching_rule_wins() {
        // "web" precedes "app" in rule order.
        assert_eq!(categorize(&project("Web app rebuild", "")), "Web Development");
        assert_eq!(categorize(&project("Fitness app", "")), "Mobile App");
    }

    #[test]
    fn matching_is_case_insensitive_over_name_and_brief() {
        assert_eq!(
            categorize(&project("Q3 engagement", "New LOGO and brand book")),
            "Design & Branding"
        );
    }

    #[test]
    fn unmatched_project_is_other() {
        assert_eq!(categorize(&project("Misc engagement", "tbd")), OTHER_CATEGORY);
    }

    #[test]
    fn distribution_shares_sum_to_one_hundred() {
        let projects = vec![
            project("Website refresh", ""),
            project("SEO sprint", ""),
            project("iOS build", ""),
            project("Something vague", ""),
        ];
        let slices = category_distribution(&projects);
        let total: f64 = slices.iter().map(|s| s.count).sum();
        let share: f64 = slices.iter().map(|s| s.share_pct).sum();
        assert_eq!(total, 4.0);
        assert!((share - 100.0).abs() < 1e-9);
        assert!(slices.iter().all(|s| s.source == CategorySource::Keyword));
    }

    #[test]
    fn keywordless_input_gets_positive_fallback_split() {
        let projects = vec![project("Untitled", "tbd"), project("Misc", "n/a")];
        let slices = category_distribution(&projects);
        assert_eq!(slices.len(), 3);
        let total: f64 = slices.iter().map(|s| s.count).sum();
        assert!((total - 2.0).abs() < 1e-9);
        assert!(slices.iter().all(|s| s.count > 0.0));
        assert!(slices.iter().all(|s| s.source == CategorySource::Fallback));
    }

    #[test]
    fn empty_input_still_yields_a_series() {
        let slices = category_distribution(&[]);
        assert_eq!(slices.len(), 3);
        assert!((slices.iter().map(|s| s.share_pct).sum::<f64>() - 100.0).abs() < 1e-9);
    }
}
