use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive calendar-day range centered on a target date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateWindow { start, end }
    }

    /// `[target − days, target + days]`, both ends inclusive.
    pub fn around(target: NaiveDate, days: u32) -> Self {
        let span = Duration::days(i64::from(days));
        DateWindow {
            start: target - span,
            end: target + span,
        }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Signed day distance from `target` to `date`; negative means `date` is
/// before the target.
pub fn days_from_target(date: NaiveDate, target: NaiveDate) -> i64 {
    (date - target).num_days()
}
