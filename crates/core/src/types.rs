//! Project and milestone data model shared by every analytics component.
//!
//! Records arrive from the persistence layer as a read-only snapshot; the
//! engine never mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Milestone billing status as stored upstream.
///
/// UI layers carry a richer vocabulary (`in_progress`, `revision_requested`,
/// ...); analytics only distinguishes earned from not-yet-earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    Pending,
    PaymentSubmitted,
    Approved,
    Rejected,
}

impl MilestoneStatus {
    /// Earned statuses count toward realized revenue.
    pub fn is_earned(&self) -> bool {
        matches!(self, Self::Approved | Self::PaymentSubmitted)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    /// Back-reference to the owning project, not an ownership edge.
    pub project_id: String,
    /// Non-negative by upstream ingestion contract; not re-validated here.
    pub price: f64,
    pub status: MilestoneStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Free text; used only by the keyword categorizer.
    pub brief: String,
    pub client_email: Option<String>,
    pub client_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub milestones: Vec<Milestone>,
}

impl Project {
    /// Identity used for client-keyed grouping: email wins over display name.
    /// A project with neither never enters a client cohort, but still counts
    /// toward global and category aggregates.
    pub fn client_identity(&self) -> Option<&str> {
        self.client_email
            .as_deref()
            .or(self.client_name.as_deref())
    }

    /// Sum of milestone prices with an earned status.
    pub fn earned_value(&self) -> f64 {
        self.milestones
            .iter()
            .filter(|m| m.status.is_earned())
            .map(|m| m.price)
            .sum()
    }

    /// Sum of all milestone prices regardless of status.
    pub fn total_milestone_value(&self) -> f64 {
        self.milestones.iter().map(|m| m.price).sum()
    }

    /// Number of milestones with an earned status.
    pub fn earned_milestones(&self) -> usize {
        self.milestones
            .iter()
            .filter(|m| m.status.is_earned())
            .count()
    }

    /// Earned milestones as a fraction of all milestones; 0 when there are
    /// no milestones at all.
    pub fn earned_fraction(&self) -> f64 {
        if self.milestones.is_empty() {
            0.0
        } else {
            self.earned_milestones() as f64 / self.milestones.len() as f64
        }
    }

    /// Instant of the most recent milestone update, falling back to the
    /// project's own `updated_at` when no milestones exist.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.milestones
            .iter()
            .map(|m| m.updated_at)
            .max()
            .unwrap_or(self.updated_at)
    }
}
