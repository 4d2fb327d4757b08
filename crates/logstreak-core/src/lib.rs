//! # logstreak core library
//!
//! Tracks a daily login streak. Each evaluation reads the stored streak,
//! compares its last login day with the current instant, and either keeps,
//! increments or resets the count before writing it back.
//!
//! ## Key Components
//!
//! - [`StreakEngine`]: evaluation against any [`Storage`]
//! - [`Storage`]: string-keyed store, with [`MemoryStorage`] and SQLite [`Database`]
//! - [`Clock`]: source of the current instant
//! - [`Config`]: TOML configuration for the CLI
//!
//! ```
//! use chrono::NaiveDate;
//! use logstreak_core::{streak_counter, MemoryStorage};
//!
//! let mut storage = MemoryStorage::new();
//! let monday = NaiveDate::from_ymd_opt(2021, 12, 13).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let streak = streak_counter(&mut storage, monday).unwrap();
//! assert_eq!(streak.current_count, 1);
//! assert_eq!(streak.formatted_start_date(), "12/13/2021");
//! ```

pub mod clock;
pub mod date;
pub mod error;
pub mod storage;
pub mod streak;

pub use clock::{Clock, FixedClock, SystemClock};
pub use date::{difference_in_days, formatted_date, parse_formatted_date};
pub use error::{ConfigError, Result, StorageError, StreakError};
pub use storage::{Config, Database, MemoryStorage, Storage};
pub use streak::{
    build_streak, streak_counter, update_streak, DayDiffMode, Evaluation, Streak, StreakEngine,
    StreakOverrides, Transition, KEY,
};
