#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};

use cosmolog::models::{CompletedSet, ExerciseProgress, WorkoutSession, WorkoutType};
use cosmolog::store::{RecordStore, StoreOptions};

/// A store backed by in-memory SQLite, already initialized.
pub async fn setup_test_store() -> RecordStore {
    let store = RecordStore::new(StoreOptions::in_memory());
    store.init().await;
    store
}

/// A store that skips SQLite and keeps records in memory.
pub async fn setup_flat_store() -> RecordStore {
    let store = RecordStore::new(StoreOptions::flat(None));
    store.init().await;
    store
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 20, 0, 0).unwrap()
}

pub fn days_before(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

// Test data creation helpers
pub fn create_test_session(
    id: &str,
    date: DateTime<Utc>,
    exercises: Vec<ExerciseProgress>,
) -> WorkoutSession {
    let mut session = WorkoutSession::new("day-1", "Upper Body", WorkoutType::Gym, date, date);
    session.id = id.to_string();
    session.end_time = Some(date + Duration::minutes(45));
    session.exercises = exercises;
    session
}

pub fn create_test_exercise(name: &str, sets: &[(u32, f64)]) -> ExerciseProgress {
    let mut exercise = ExerciseProgress::new(
        name,
        sets.iter()
            .map(|&(reps, weight)| CompletedSet::done(reps, weight))
            .collect(),
    );
    exercise.target_sets = sets.len().to_string();
    exercise.target_reps = "8-12".to_string();
    exercise
}

/// One session per day ending at `now`, each with the given sets of `exercise`.
pub fn create_daily_sessions(
    now: DateTime<Utc>,
    days: i64,
    exercise: &str,
    sets: &[(u32, f64)],
) -> Vec<WorkoutSession> {
    (0..days)
        .rev()
        .map(|offset| {
            create_test_session(
                &format!("s-{}", offset),
                days_before(now, offset),
                vec![create_test_exercise(exercise, sets)],
            )
        })
        .collect()
}
