use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::WorkoutType;
use crate::store::StoreRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseTemplate {
    pub name: String,
    pub sets: String,
    pub reps: String,
    #[serde(default)]
    pub notes: String,
}

/// A workout template, either from the fixed program or authored by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub day: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub workout_type: WorkoutType,
    pub exercises: Vec<ExerciseTemplate>,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl StoreRecord for Workout {
    fn record_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkoutUpdate {
    pub day: Option<u32>,
    pub name: Option<String>,
    pub workout_type: Option<WorkoutType>,
    pub exercises: Option<Vec<ExerciseTemplate>>,
}

impl WorkoutUpdate {
    pub fn apply(self, workout: &mut Workout) {
        if let Some(day) = self.day {
            workout.day = day;
        }
        if let Some(name) = self.name {
            workout.name = name;
        }
        if let Some(workout_type) = self.workout_type {
            workout.workout_type = workout_type;
        }
        if let Some(exercises) = self.exercises {
            workout.exercises = exercises;
        }
    }
}
