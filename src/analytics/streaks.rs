use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{
    BadgeMetric, StreakBadge, StreakData, StreakStatus, WeeklyFrequency, WorkoutSession,
};

/// The backward walk for the current streak stops after this many days.
const MAX_STREAK_LOOKBACK_DAYS: u32 = 365;

struct BadgeDefinition {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    threshold: u32,
    metric: BadgeMetric,
}

const BADGES: &[BadgeDefinition] = &[
    BadgeDefinition {
        id: "first-workout",
        name: "First Step",
        description: "Complete your first workout",
        icon: "🎯",
        threshold: 1,
        metric: BadgeMetric::TotalWorkouts,
    },
    BadgeDefinition {
        id: "3-day-streak",
        name: "3-Day Warrior",
        description: "Maintain a 3-day streak",
        icon: "🔥",
        threshold: 3,
        metric: BadgeMetric::Streak,
    },
    BadgeDefinition {
        id: "7-day-streak",
        name: "Week Champion",
        description: "Maintain a 7-day streak",
        icon: "⚡",
        threshold: 7,
        metric: BadgeMetric::Streak,
    },
    BadgeDefinition {
        id: "14-day-streak",
        name: "Fortnight Fighter",
        description: "Maintain a 14-day streak",
        icon: "💪",
        threshold: 14,
        metric: BadgeMetric::Streak,
    },
    BadgeDefinition {
        id: "30-day-streak",
        name: "Monthly Master",
        description: "Maintain a 30-day streak",
        icon: "👑",
        threshold: 30,
        metric: BadgeMetric::Streak,
    },
    BadgeDefinition {
        id: "50-day-streak",
        name: "Unstoppable",
        description: "Maintain a 50-day streak",
        icon: "🏆",
        threshold: 50,
        metric: BadgeMetric::Streak,
    },
    BadgeDefinition {
        id: "100-day-streak",
        name: "Legendary",
        description: "Maintain a 100-day streak",
        icon: "⭐",
        threshold: 100,
        metric: BadgeMetric::Streak,
    },
    BadgeDefinition {
        id: "10-workouts",
        name: "Getting Started",
        description: "Complete 10 total workouts",
        icon: "🎖️",
        threshold: 10,
        metric: BadgeMetric::TotalWorkouts,
    },
    BadgeDefinition {
        id: "50-workouts",
        name: "Dedicated",
        description: "Complete 50 total workouts",
        icon: "🥇",
        threshold: 50,
        metric: BadgeMetric::TotalWorkouts,
    },
    BadgeDefinition {
        id: "100-workouts",
        name: "Century Club",
        description: "Complete 100 total workouts",
        icon: "💯",
        threshold: 100,
        metric: BadgeMetric::TotalWorkouts,
    },
];

pub fn calculate_streak(sessions: &[WorkoutSession]) -> StreakData {
    calculate_streak_at(sessions, Utc::now())
}

/// Streak figures as of `now`. Days are UTC calendar days.
pub fn calculate_streak_at(sessions: &[WorkoutSession], now: DateTime<Utc>) -> StreakData {
    if sessions.is_empty() {
        return StreakData::empty();
    }

    let workout_days: BTreeSet<NaiveDate> = sessions.iter().map(|s| s.date.date_naive()).collect();
    let today = now.date_naive();

    let current_streak = current_streak(&workout_days, today);
    let longest_streak = longest_streak(&workout_days);

    let last_workout_date = workout_days.last().copied();
    let days_since_last = last_workout_date
        .map(|last| (today - last).num_days())
        .unwrap_or(i64::MAX);

    let (streak_status, days_until_break) = match days_since_last {
        0 => (StreakStatus::Active, 2),
        1 => (StreakStatus::AtRisk, 1),
        _ => (StreakStatus::Broken, 0),
    };

    StreakData {
        current_streak,
        longest_streak,
        total_workouts: sessions.len() as u32,
        last_workout_date,
        streak_status,
        days_until_break,
        weekly_frequency: weekly_frequency(sessions, now),
    }
}

/// Count back from today. A missing today is skipped once, since the day
/// is not over yet.
fn current_streak(workout_days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;

    for step in 0..MAX_STREAK_LOOKBACK_DAYS {
        if workout_days.contains(&day) {
            streak += 1;
        } else if step != 0 {
            break;
        }
        day -= Duration::days(1);
    }

    streak
}

fn longest_streak(workout_days: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for &day in workout_days {
        run = match previous {
            Some(prev) if (day - prev).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }

    longest
}

fn weekly_frequency(sessions: &[WorkoutSession], now: DateTime<Utc>) -> WeeklyFrequency {
    let one_week_ago = now - Duration::days(7);
    let two_weeks_ago = now - Duration::days(14);

    let this_week = sessions.iter().filter(|s| s.date >= one_week_ago).count() as u32;
    let last_week = sessions
        .iter()
        .filter(|s| s.date >= two_weeks_ago && s.date < one_week_ago)
        .count() as u32;

    let average = match sessions.iter().map(|s| s.date).min() {
        Some(first) => {
            let week_ms = Duration::days(7).num_milliseconds() as f64;
            let elapsed_weeks = ((now - first).num_milliseconds() as f64 / week_ms).ceil();
            let total_weeks = elapsed_weeks.max(1.0);
            (sessions.len() as f64 / total_weeks * 10.0).round() / 10.0
        }
        None => 0.0,
    };

    WeeklyFrequency {
        this_week,
        last_week,
        average,
    }
}

/// Every badge with its achievement state. Streak badges are judged on the
/// longest streak, so they stay earned after a streak ends.
pub fn get_streak_badges(streak: &StreakData) -> Vec<StreakBadge> {
    BADGES
        .iter()
        .map(|badge| {
            let (value, achieved) = match badge.metric {
                BadgeMetric::TotalWorkouts => {
                    (streak.total_workouts, streak.total_workouts >= badge.threshold)
                }
                BadgeMetric::Streak => (
                    streak.current_streak.max(streak.longest_streak),
                    streak.longest_streak >= badge.threshold,
                ),
            };

            StreakBadge {
                id: badge.id,
                name: badge.name,
                description: badge.description,
                icon: badge.icon,
                threshold: badge.threshold,
                metric: badge.metric,
                achieved,
                progress: (value as f64 / badge.threshold as f64 * 100.0).min(100.0),
            }
        })
        .collect()
}

pub fn get_streak_message(streak: &StreakData) -> &'static str {
    match (streak.streak_status, streak.current_streak) {
        (StreakStatus::Broken, _) => "Start your comeback! Every champion has setbacks.",
        (StreakStatus::AtRisk, _) => "⚠️ Streak at risk! Don't break the chain!",
        (_, 0) => "Begin your journey! The first step is always the hardest.",
        (_, n) if n >= 100 => "🏆 LEGENDARY! You're an unstoppable force!",
        (_, n) if n >= 50 => "⭐ INCREDIBLE! You're rewriting what's possible!",
        (_, n) if n >= 30 => "👑 CHAMPION! One month of pure dedication!",
        (_, n) if n >= 14 => "💪 BEAST MODE! Two weeks of consistency!",
        (_, n) if n >= 7 => "⚡ ON FIRE! A full week conquered!",
        (_, n) if n >= 3 => "🔥 HEATING UP! Keep the momentum going!",
        _ => "🎯 Great start! Build the habit one day at a time!",
    }
}
