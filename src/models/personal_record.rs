use chrono::{DateTime, Utc};
use serde::Serialize;

/// Best-ever performance for one exercise, derived from session history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalRecord {
    pub exercise_name: String,
    pub max_weight: f64,
    pub max_weight_reps: u32,
    pub max_weight_date: DateTime<Utc>,
    pub max_weight_session_id: String,
    pub max_reps: u32,
    pub max_reps_weight: f64,
    pub max_reps_date: DateTime<Utc>,
    pub max_reps_session_id: String,
    pub total_sets: u32,
    pub total_sessions: u32,
    pub last_performed: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrType {
    Weight,
    Reps,
    Both,
}

impl PrType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrType::Weight => "weight",
            PrType::Reps => "reps",
            PrType::Both => "both",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrType::Weight => "New Weight PR!",
            PrType::Reps => "New Reps PR!",
            PrType::Both => "Double PR!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrUpdate {
    pub exercise_name: String,
    #[serde(rename = "type")]
    pub pr_type: PrType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_reps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_reps: Option<u32>,
}

/// A set performed in the session currently in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentSet {
    pub exercise_name: String,
    pub weight: f64,
    pub reps: u32,
}

impl CurrentSet {
    pub fn new(exercise_name: impl Into<String>, weight: f64, reps: u32) -> Self {
        Self {
            exercise_name: exercise_name.into(),
            weight,
            reps,
        }
    }
}
