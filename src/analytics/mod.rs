//! Derived statistics over session history.
//!
//! Everything here is a pure function of the session list. Results are
//! recomputed on every call; nothing is cached.

pub mod overload;
pub mod personal_records;
pub mod streaks;

pub use overload::{
    analyze_exercise_progression, get_all_overload_recommendations, get_workout_overload_info,
};
pub use personal_records::{
    calculate_personal_records, check_for_new_prs, flatten_session_sets, format_pr_date,
};
pub use streaks::{calculate_streak, calculate_streak_at, get_streak_badges, get_streak_message};
