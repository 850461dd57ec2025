//! Revenue, trend, and time/performance aggregation over the project
//! snapshot — pure functions of `(projects, now)`.

pub mod performance;
pub mod period;
pub mod revenue;
pub mod trend;

pub use performance::PerformanceSummary;
pub use period::MonthWindow;
pub use revenue::RevenueSummary;
pub use trend::{Trend, TrendDirection};
