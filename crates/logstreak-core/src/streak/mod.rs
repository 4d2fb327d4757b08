mod engine;
mod model;

pub use engine::{
    streak_counter, update_streak, DayDiffMode, Evaluation, StreakEngine, Transition, KEY,
};
pub use model::{build_streak, Streak, StreakOverrides};
