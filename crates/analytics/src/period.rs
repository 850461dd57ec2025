//! Calendar-month windows used by every time-bucketed aggregation.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Half-open `[start, end)` calendar-month interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthWindow {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

fn month_start(year: i32, month: u32) -> DateTime<Utc> {
    // (year, month) always comes from Datelike accessors or the rollover
    // helpers below, so the construction cannot be ambiguous.
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Calendar month containing `now`.
pub fn this_month(now: DateTime<Utc>) -> MonthWindow {
    let (y, m) = (now.year(), now.month());
    let (ny, nm) = next_month(y, m);
    MonthWindow {
        start: month_start(y, m),
        end: month_start(ny, nm),
    }
}

/// Calendar month immediately before the one containing `now`.
pub fn last_month(now: DateTime<Utc>) -> MonthWindow {
    let (py, pm) = prev_month(now.year(), now.month());
    let (y, m) = (now.year(), now.month());
    MonthWindow {
        start: month_start(py, pm),
        end: month_start(y, m),
    }
}

/// The `n` calendar months ending at (and including) the current month,
/// oldest first. Used to build fixed-length trend series.
pub fn months_back(now: DateTime<Utc>, n: u32) -> Vec<MonthWindow> {
    let mut windows = Vec::with_capacity(n as usize);
    let (mut y, mut m) = (now.year(), now.month());
    for _ in 0..n {
        let (ny, nm) = next_month(y, m);
        windows.push(MonthWindow {
            start: month_start(y, m),
            end: month_start(ny, nm),
        });
        let (py, pm) = prev_month(y, m);
        y = py;
        m = pm;
    }
    windows.reverse();
    windows
}
