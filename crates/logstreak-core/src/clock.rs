//! Sources of "now" for streak evaluation.

use chrono::{Local, NaiveDateTime};

/// Supplies the local wall-clock instant used by an evaluation.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
