use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreakStatus {
    /// Worked out today.
    Active,
    /// Last workout was yesterday; today still keeps the streak alive.
    AtRisk,
    Broken,
}

impl StreakStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreakStatus::Active => "active",
            StreakStatus::AtRisk => "at-risk",
            StreakStatus::Broken => "broken",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyFrequency {
    pub this_week: u32,
    pub last_week: u32,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakData {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_workouts: u32,
    pub last_workout_date: Option<NaiveDate>,
    pub streak_status: StreakStatus,
    pub days_until_break: u32,
    pub weekly_frequency: WeeklyFrequency,
}

impl StreakData {
    pub fn empty() -> Self {
        Self {
            current_streak: 0,
            longest_streak: 0,
            total_workouts: 0,
            last_workout_date: None,
            streak_status: StreakStatus::Broken,
            days_until_break: 0,
            weekly_frequency: WeeklyFrequency::default(),
        }
    }
}

/// Which number a badge is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BadgeMetric {
    TotalWorkouts,
    Streak,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakBadge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub threshold: u32,
    pub metric: BadgeMetric,
    pub achieved: bool,
    pub progress: f64,
}
