//! Streak evaluation: read the stored record, classify the day gap, write back.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::model::{parse_record, Streak};
use crate::clock::Clock;
use crate::date::{calendar_days_between, difference_in_days, start_of_day};
use crate::error::Result;
use crate::storage::Storage;

/// Storage key the streak record lives under unless configured otherwise.
pub const KEY: &str = "streak";

/// How the gap between the last login and now is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayDiffMode {
    /// Whole calendar days between the last login day and today.
    #[default]
    Calendar,
    /// Elapsed time from midnight of the last login day, rounded up to days.
    ///
    /// A login at any time after midnight on the stored day counts as one day,
    /// so repeated logins on one day keep incrementing while the start and
    /// last login dates stay equal. The count then no longer matches the span
    /// of days covered.
    Elapsed,
}

/// Which branch an evaluation took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// No usable prior record; a new streak began.
    Started,
    /// Already logged in today; nothing changed.
    SameDay,
    /// Logged in on the next day; the count went up.
    Continued,
    /// Two or more days passed; the streak restarted.
    Reset,
    /// Now falls on a day before the last login; nothing changed.
    Backdated,
}

/// Result of [`StreakEngine::evaluate_detailed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub streak: Streak,
    pub transition: Transition,
    /// Day gap used for the decision, `None` when there was no prior record.
    pub days_diff: Option<i64>,
}

/// Evaluates and persists login streaks in a [`Storage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakEngine {
    key: String,
    mode: DayDiffMode,
}

impl Default for StreakEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StreakEngine {
    /// Engine using [`KEY`] and calendar-day comparison.
    pub fn new() -> Self {
        Self {
            key: KEY.to_string(),
            mode: DayDiffMode::default(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_mode(mut self, mode: DayDiffMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn mode(&self) -> DayDiffMode {
        self.mode
    }

    /// Record a login at `now` and return the resulting streak.
    ///
    /// # Errors
    /// Returns an error if the storage backend fails. A missing or malformed
    /// record is not an error; it starts a new streak.
    pub fn evaluate<S: Storage + ?Sized>(&self, storage: &mut S, now: NaiveDateTime) -> Result<Streak> {
        Ok(self.evaluate_detailed(storage, now)?.streak)
    }

    /// Like [`evaluate`](Self::evaluate), also reporting the transition taken.
    ///
    /// # Errors
    /// Returns an error if the storage backend fails.
    pub fn evaluate_detailed<S: Storage + ?Sized>(
        &self,
        storage: &mut S,
        now: NaiveDateTime,
    ) -> Result<Evaluation> {
        let today = now.date();

        let Some(prior) = self.current(&*storage)? else {
            let streak = Streak::first_day(today);
            update_streak(storage, &self.key, &streak)?;
            debug!(key = %self.key, date = %streak.formatted_last_login_date(), "streak started");
            return Ok(Evaluation {
                streak,
                transition: Transition::Started,
                days_diff: None,
            });
        };

        if today < prior.last_login_date {
            let days_diff = (today - prior.last_login_date).num_days();
            warn!(
                key = %self.key,
                days_diff,
                last_login = %prior.formatted_last_login_date(),
                "clock is behind the last login, keeping stored streak"
            );
            return Ok(Evaluation {
                streak: prior,
                transition: Transition::Backdated,
                days_diff: Some(days_diff),
            });
        }

        let days_diff = self.days_since(&prior, now);
        let (streak, transition) = match days_diff {
            0 => (prior, Transition::SameDay),
            1 => (prior.continued(today), Transition::Continued),
            _ => (Streak::first_day(today), Transition::Reset),
        };

        if transition != Transition::SameDay {
            update_streak(storage, &self.key, &streak)?;
        }
        debug!(
            key = %self.key,
            days_diff,
            ?transition,
            count = streak.current_count,
            "streak evaluated"
        );

        Ok(Evaluation {
            streak,
            transition,
            days_diff: Some(days_diff),
        })
    }

    /// [`evaluate_detailed`](Self::evaluate_detailed) at the instant supplied by `clock`.
    ///
    /// # Errors
    /// Returns an error if the storage backend fails.
    pub fn check_in<S: Storage + ?Sized, C: Clock + ?Sized>(
        &self,
        storage: &mut S,
        clock: &C,
    ) -> Result<Evaluation> {
        self.evaluate_detailed(storage, clock.now())
    }

    /// The stored streak, if there is a usable one. Never writes.
    ///
    /// # Errors
    /// Returns an error if the storage backend fails.
    pub fn current<S: Storage + ?Sized>(&self, storage: &S) -> Result<Option<Streak>> {
        let Some(raw) = storage.get(&self.key)? else {
            return Ok(None);
        };
        match parse_record(&raw) {
            Ok(streak) => Ok(Some(streak)),
            Err(reason) => {
                warn!(key = %self.key, %reason, "discarding unreadable streak record");
                Ok(None)
            }
        }
    }

    fn days_since(&self, prior: &Streak, now: NaiveDateTime) -> i64 {
        match self.mode {
            DayDiffMode::Calendar => calendar_days_between(now.date(), prior.last_login_date),
            DayDiffMode::Elapsed => difference_in_days(now, start_of_day(prior.last_login_date)),
        }
    }
}

/// Overwrite `key` with the serialized streak.
///
/// # Errors
/// Returns an error if serialization or the storage write fails.
pub fn update_streak<S: Storage + ?Sized>(storage: &mut S, key: &str, streak: &Streak) -> Result<()> {
    let json = serde_json::to_string(streak)?;
    storage.set(key, &json)?;
    Ok(())
}

/// Record a login at `now` with the default engine.
///
/// # Errors
/// Returns an error if the storage backend fails.
pub fn streak_counter<S: Storage + ?Sized>(storage: &mut S, now: NaiveDateTime) -> Result<Streak> {
    StreakEngine::new().evaluate(storage, now)
}
