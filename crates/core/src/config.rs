use serde::Deserialize;

/// Analytics engine thresholds. Loaded from environment variables with the
/// prefix `PULSE__`; every field has a product default, so `Default` yields
/// a fully usable configuration.
///
/// These are tunable product constants, not mathematical truths: the trend
/// neutral band and the 70% completion threshold in particular are shared by
/// several components and must come from here rather than being re-derived
/// at call sites.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Percent-change window around zero classified as a neutral trend.
    #[serde(default = "default_trend_neutral_band_pct")]
    pub trend_neutral_band_pct: f64,
    /// Earned-milestone fraction at which a project counts as completed.
    #[serde(default = "default_completion_threshold")]
    pub completion_threshold: f64,
    /// A milestone-less project is still "active" this many days after creation.
    #[serde(default = "default_recent_project_window_days")]
    pub recent_project_window_days: i64,
    /// Months of history in revenue/pricing trend series.
    #[serde(default = "default_trend_window_months")]
    pub trend_window_months: u32,
    /// Client growth split: projects created within this many months are "recent".
    #[serde(default = "default_growth_window_months")]
    pub growth_window_months: u32,
    /// Recent-vs-older spend ratio above which a client is growing.
    #[serde(default = "default_growth_increase_factor")]
    pub growth_increase_factor: f64,
    /// Recent-vs-older spend ratio below which a client is shrinking.
    #[serde(default = "default_growth_decrease_factor")]
    pub growth_decrease_factor: f64,
    /// Days without a new project before a client is high risk.
    #[serde(default = "default_dormancy_high_days")]
    pub dormancy_high_days: i64,
    /// Days without a new project before a client is medium risk.
    #[serde(default = "default_dormancy_medium_days")]
    pub dormancy_medium_days: i64,
    /// Payment reliability below this percentage is high risk.
    #[serde(default = "default_reliability_high_floor_pct")]
    pub reliability_high_floor_pct: f64,
    /// Payment reliability below this percentage is medium risk.
    #[serde(default = "default_reliability_medium_floor_pct")]
    pub reliability_medium_floor_pct: f64,
    /// Lifetime value floor for the champion cohort.
    #[serde(default = "default_champion_value_floor")]
    pub champion_value_floor: f64,
    /// Minimum project count for the champion cohort.
    #[serde(default = "default_champion_min_projects")]
    pub champion_min_projects: usize,
    /// Uplift factor applied to the current average rate when suggesting a new one.
    #[serde(default = "default_rate_uplift_factor")]
    pub rate_uplift_factor: f64,
    /// Assumed project duration in days when start/end dates are absent.
    #[serde(default = "default_duration_days")]
    pub default_duration_days: f64,
}

fn default_trend_neutral_band_pct() -> f64 { 5.0 }
fn default_completion_threshold() -> f64 { 0.7 }
fn default_recent_project_window_days() -> i64 { 30 }
fn default_trend_window_months() -> u32 { 6 }
fn default_growth_window_months() -> u32 { 6 }
fn default_growth_increase_factor() -> f64 { 1.1 }
fn default_growth_decrease_factor() -> f64 { 0.9 }
fn default_dormancy_high_days() -> i64 { 180 }
fn default_dormancy_medium_days() -> i64 { 90 }
fn default_reliability_high_floor_pct() -> f64 { 60.0 }
fn default_reliability_medium_floor_pct() -> f64 { 80.0 }
fn default_champion_value_floor() -> f64 { 5000.0 }
fn default_champion_min_projects() -> usize { 3 }
fn default_rate_uplift_factor() -> f64 { 1.15 }
fn default_duration_days() -> f64 { 30.0 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trend_neutral_band_pct: default_trend_neutral_band_pct(),
            completion_threshold: default_completion_threshold(),
            recent_project_window_days: default_recent_project_window_days(),
            trend_window_months: default_trend_window_months(),
            growth_window_months: default_growth_window_months(),
            growth_increase_factor: default_growth_increase_factor(),
            growth_decrease_factor: default_growth_decrease_factor(),
            dormancy_high_days: default_dormancy_high_days(),
            dormancy_medium_days: default_dormancy_medium_days(),
            reliability_high_floor_pct: default_reliability_high_floor_pct(),
            reliability_medium_floor_pct: default_reliability_medium_floor_pct(),
            champion_value_floor: default_champion_value_floor(),
            champion_min_projects: default_champion_min_projects(),
            rate_uplift_factor: default_rate_uplift_factor(),
            default_duration_days: default_duration_days(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("PULSE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
