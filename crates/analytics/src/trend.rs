//! Shared trend classification. Revenue and success-rate trends both go
//! through [`classify`] so the neutral band stays a single product constant.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    pub pct_change: f64,
}

/// Compare a current scalar against a prior one.
///
/// Without a positive prior baseline the change is reported as +100% when
/// anything was earned and 0% otherwise. The band comparison is a strict
/// inequality: a change of exactly `neutral_band_pct` is still neutral.
pub fn classify(current: f64, prior: f64, neutral_band_pct: f64) -> Trend {
    let pct_change = if prior > 0.0 {
        (current - prior) / prior * 100.0
    } else if current > 0.0 {
        100.0
    } else {
        0.0
    };

    let direction = if pct_change > neutral_band_pct {
        TrendDirection::Up
    } else if pct_change < -neutral_band_pct {
        TrendDirection::Down
    } else {
        TrendDirection::Neutral
    };

    Trend {
        direction,
        pct_change,
    }
}
