//! The persisted streak record and its construction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::{self, us_format};

/// A login streak.
///
/// Serialized as `{"currentCount":2,"startDate":"12/12/2021","lastLoginDate":"12/13/2021"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Streak {
    /// Consecutive calendar days logged in, including the last login day.
    pub current_count: u32,

    /// Day the current streak began.
    #[serde(with = "us_format")]
    pub start_date: NaiveDate,

    /// Day of the most recent recorded login.
    #[serde(with = "us_format")]
    pub last_login_date: NaiveDate,
}

impl Streak {
    /// A one-day streak starting and ending on `date`.
    pub fn first_day(date: NaiveDate) -> Self {
        Self {
            current_count: 1,
            start_date: date,
            last_login_date: date,
        }
    }

    /// The streak extended to `date`, keeping its start.
    pub fn continued(&self, date: NaiveDate) -> Self {
        Self {
            current_count: self.current_count.saturating_add(1),
            start_date: self.start_date,
            last_login_date: date,
        }
    }

    /// Count is at least one and the last login is not before the start.
    pub fn is_consistent(&self) -> bool {
        self.current_count >= 1 && self.last_login_date >= self.start_date
    }

    pub fn formatted_start_date(&self) -> String {
        date::formatted_date(self.start_date)
    }

    pub fn formatted_last_login_date(&self) -> String {
        date::formatted_date(self.last_login_date)
    }
}

/// Fields to set explicitly when building a streak. `None` keeps the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakOverrides {
    pub current_count: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub last_login_date: Option<NaiveDate>,
}

impl StreakOverrides {
    pub fn current_count(mut self, count: u32) -> Self {
        self.current_count = Some(count);
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn last_login_date(mut self, date: NaiveDate) -> Self {
        self.last_login_date = Some(date);
        self
    }
}

/// Build a streak for `date`, then apply each override that is set.
pub fn build_streak(date: NaiveDate, overrides: StreakOverrides) -> Streak {
    let defaults = Streak::first_day(date);
    Streak {
        current_count: overrides.current_count.unwrap_or(defaults.current_count),
        start_date: overrides.start_date.unwrap_or(defaults.start_date),
        last_login_date: overrides.last_login_date.unwrap_or(defaults.last_login_date),
    }
}

/// Parse a stored record, rejecting anything that is not a consistent streak.
pub(crate) fn parse_record(raw: &str) -> Result<Streak, String> {
    let streak: Streak = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    if !streak.is_consistent() {
        return Err(format!(
            "inconsistent streak: count {} from {} to {}",
            streak.current_count,
            streak.formatted_start_date(),
            streak.formatted_last_login_date()
        ));
    }
    Ok(streak)
}
