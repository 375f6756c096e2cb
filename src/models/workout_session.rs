use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::store::StoreRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    Home,
    Gym,
    Bag,
}

impl WorkoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutType::Home => "home",
            WorkoutType::Gym => "gym",
            WorkoutType::Bag => "bag",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletedSet {
    pub reps: u32,
    pub weight: f64,
    pub completed: bool,
}

impl CompletedSet {
    pub fn done(reps: u32, weight: f64) -> Self {
        Self {
            reps,
            weight,
            completed: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseProgress {
    pub exercise_name: String,
    pub target_sets: String,
    pub target_reps: String,
    #[serde(default)]
    pub notes: String,
    pub completed_sets: Vec<CompletedSet>,
}

impl ExerciseProgress {
    pub fn new(exercise_name: impl Into<String>, completed_sets: Vec<CompletedSet>) -> Self {
        Self {
            exercise_name: exercise_name.into(),
            target_sets: String::new(),
            target_reps: String::new(),
            notes: String::new(),
            completed_sets,
        }
    }

    pub fn completed(&self) -> impl Iterator<Item = &CompletedSet> {
        self.completed_sets.iter().filter(|set| set.completed)
    }
}

/// One finished workout. Never modified after it is saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub id: String,
    pub workout_id: String,
    pub workout_name: String,
    pub workout_type: WorkoutType,
    pub date: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub exercises: Vec<ExerciseProgress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_notes: Option<String>,
}

impl WorkoutSession {
    /// Start building a session with a fresh id, recorded at `date`.
    pub fn new(
        workout_id: impl Into<String>,
        workout_name: impl Into<String>,
        workout_type: WorkoutType,
        start_time: DateTime<Utc>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            workout_id: workout_id.into(),
            workout_name: workout_name.into(),
            workout_type,
            date,
            start_time,
            end_time: None,
            exercises: Vec::new(),
            session_notes: None,
        }
    }

    pub fn with_exercise(mut self, exercise: ExerciseProgress) -> Self {
        self.exercises.push(exercise);
        self
    }

    pub fn exercise(&self, name: &str) -> Option<&ExerciseProgress> {
        self.exercises.iter().find(|e| e.exercise_name == name)
    }

    pub fn completed_set_count(&self) -> usize {
        self.exercises.iter().map(|e| e.completed().count()).sum()
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::Validation("session id is empty".to_string()));
        }
        for exercise in &self.exercises {
            for set in &exercise.completed_sets {
                if !set.weight.is_finite() || set.weight < 0.0 {
                    return Err(AppError::Validation(format!(
                        "invalid weight {} for {}",
                        set.weight, exercise.exercise_name
                    )));
                }
            }
        }
        Ok(())
    }
}

impl StoreRecord for WorkoutSession {
    fn record_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total_workouts: usize,
    pub workouts_by_type: BTreeMap<WorkoutType, usize>,
    pub total_sets_completed: usize,
}
