use chrono::{DateTime, Utc};
use serde::Serialize;

use super::CompletedSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Stable,
    Decreasing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    IncreaseWeight,
    IncreaseReps,
    Maintain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Target rep range used to judge recent sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepRange {
    pub min: u32,
    pub max: u32,
}

impl Default for RepRange {
    fn default() -> Self {
        Self { min: 8, max: 12 }
    }
}

/// One session's completed sets for a single exercise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub date: DateTime<Utc>,
    pub session_id: String,
    pub sets: Vec<CompletedSet>,
    pub max_weight: f64,
    pub max_reps: u32,
    pub average_reps: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverloadRecommendation {
    #[serde(rename = "type")]
    pub recommendation_type: RecommendationType,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_reps: Option<u32>,
    pub confidence: Confidence,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseHistory {
    pub exercise_name: String,
    pub sessions: Vec<SessionData>,
    pub average_weight: f64,
    pub average_reps: f64,
    pub trend: Trend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<OverloadRecommendation>,
}

/// What the active-exercise banner shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverloadInfo {
    pub last_three_sessions: Vec<SessionData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<OverloadRecommendation>,
}
