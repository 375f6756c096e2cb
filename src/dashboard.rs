use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analytics::{
    calculate_personal_records, calculate_streak_at, get_all_overload_recommendations,
    get_streak_badges, get_streak_message,
};
use crate::models::{ExerciseHistory, PersonalRecord, StreakBadge, StreakData, WorkoutSession};

/// Everything the home screen shows, computed from the full history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub streak: StreakData,
    pub badges: Vec<StreakBadge>,
    pub message: &'static str,
    pub personal_records: BTreeMap<String, PersonalRecord>,
    pub recommendations: BTreeMap<String, ExerciseHistory>,
}

impl DashboardSummary {
    pub fn build(sessions: &[WorkoutSession], now: DateTime<Utc>) -> Self {
        let streak = calculate_streak_at(sessions, now);
        let badges = get_streak_badges(&streak);
        let message = get_streak_message(&streak);

        Self {
            streak,
            badges,
            message,
            personal_records: calculate_personal_records(sessions),
            recommendations: get_all_overload_recommendations(sessions),
        }
    }

    pub fn achieved_badges(&self) -> usize {
        self.badges.iter().filter(|b| b.achieved).count()
    }
}
