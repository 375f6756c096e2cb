use std::collections::{BTreeMap, BTreeSet};

use crate::models::{
    CompletedSet, Confidence, ExerciseHistory, OverloadInfo, OverloadRecommendation,
    RecommendationType, RepRange, SessionData, Trend, WorkoutSession,
};

/// Sessions looked at when deciding on a recommendation.
const RECENT_SESSIONS: usize = 3;

/// Recent-half mean must move by more than this share of the older-half mean.
const TREND_THRESHOLD: f64 = 0.05;

/// History, trend and recommendation for one exercise, or `None` when no
/// session contains it.
pub fn analyze_exercise_progression(
    exercise_name: &str,
    sessions: &[WorkoutSession],
    rep_range: RepRange,
) -> Option<ExerciseHistory> {
    let mut relevant: Vec<&WorkoutSession> = sessions
        .iter()
        .filter(|s| s.exercise(exercise_name).is_some())
        .collect();
    if relevant.is_empty() {
        return None;
    }
    relevant.sort_by_key(|s| s.date);

    let session_data: Vec<SessionData> = relevant
        .iter()
        .filter_map(|s| s.exercise(exercise_name).map(|e| (s, e)))
        .map(|(session, exercise)| {
            let sets: Vec<CompletedSet> = exercise.completed().copied().collect();
            summarize(session, sets)
        })
        .collect();

    let total_sets: usize = session_data.iter().map(|s| s.sets.len()).sum();
    let (average_weight, average_reps) = if total_sets > 0 {
        let all_sets = session_data.iter().flat_map(|s| s.sets.iter());
        let (weight_sum, reps_sum) = all_sets.fold((0.0, 0.0), |(w, r), set| {
            (w + set.weight, r + set.reps as f64)
        });
        (weight_sum / total_sets as f64, reps_sum / total_sets as f64)
    } else {
        (0.0, 0.0)
    };

    let trend = calculate_trend(&session_data);
    let recommendation = generate_recommendation(&session_data, rep_range);

    Some(ExerciseHistory {
        exercise_name: exercise_name.to_string(),
        sessions: session_data,
        average_weight,
        average_reps,
        trend,
        recommendation,
    })
}

fn summarize(session: &WorkoutSession, sets: Vec<CompletedSet>) -> SessionData {
    let max_weight = sets.iter().map(|s| s.weight).fold(0.0, f64::max);
    let max_reps = sets.iter().map(|s| s.reps).max().unwrap_or(0);
    let average_reps = if sets.is_empty() {
        0.0
    } else {
        sets.iter().map(|s| s.reps as f64).sum::<f64>() / sets.len() as f64
    };

    SessionData {
        date: session.date,
        session_id: session.id.clone(),
        sets,
        max_weight,
        max_reps,
        average_reps,
    }
}

fn mean_max_weight(sessions: &[SessionData]) -> f64 {
    sessions.iter().map(|s| s.max_weight).sum::<f64>() / sessions.len() as f64
}

fn calculate_trend(sessions: &[SessionData]) -> Trend {
    if sessions.len() < 2 {
        return Trend::Stable;
    }

    let (older, recent) = sessions.split_at(sessions.len() / 2);
    let older_avg = mean_max_weight(older);
    let difference = mean_max_weight(recent) - older_avg;
    let threshold = older_avg * TREND_THRESHOLD;

    if difference > threshold {
        Trend::Increasing
    } else if difference < -threshold {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

/// True when at least half of the session's sets (rounded up) match.
fn at_least_half(session: &SessionData, predicate: impl Fn(&CompletedSet) -> bool) -> bool {
    let matching = session.sets.iter().filter(|set| predicate(set)).count();
    matching >= session.sets.len().div_ceil(2)
}

fn weight_increment(current_weight: f64) -> f64 {
    if current_weight < 20.0 {
        2.5
    } else if current_weight < 50.0 {
        5.0
    } else {
        10.0
    }
}

/// Topping out is checked before struggling. When both hold, a loaded
/// bar gets an increase in weight and an empty one gets more reps.
fn generate_recommendation(
    sessions: &[SessionData],
    rep_range: RepRange,
) -> Option<OverloadRecommendation> {
    if sessions.len() < 2 {
        return None;
    }

    let recent = &sessions[sessions.len().saturating_sub(RECENT_SESSIONS)..];
    let hitting_top_reps = recent
        .iter()
        .all(|s| at_least_half(s, |set| set.reps >= rep_range.max));
    let struggling_with_reps = recent
        .iter()
        .all(|s| at_least_half(s, |set| set.reps < rep_range.min));
    let current_weight = recent.last().map(|s| s.max_weight).unwrap_or(0.0);

    if hitting_top_reps && current_weight > 0.0 {
        return Some(OverloadRecommendation {
            recommendation_type: RecommendationType::IncreaseWeight,
            message: format!(
                "Time to level up! You're crushing {}+ reps consistently.",
                rep_range.max
            ),
            suggested_weight: Some(current_weight + weight_increment(current_weight)),
            suggested_reps: Some(rep_range.min),
            confidence: Confidence::High,
            reason: "Last 3 sessions show consistent top rep performance".to_string(),
        });
    }

    if !struggling_with_reps && !hitting_top_reps {
        return Some(OverloadRecommendation {
            recommendation_type: RecommendationType::Maintain,
            message: "Keep it up! You're in the optimal range.".to_string(),
            suggested_weight: None,
            suggested_reps: None,
            confidence: Confidence::High,
            reason: "Performance is stable within target range".to_string(),
        });
    }

    if struggling_with_reps {
        return Some(OverloadRecommendation {
            recommendation_type: RecommendationType::IncreaseReps,
            message: format!(
                "Focus on hitting {}+ reps before adding weight.",
                rep_range.min
            ),
            suggested_weight: None,
            suggested_reps: Some(rep_range.min),
            confidence: Confidence::Medium,
            reason: "Recent sessions show lower rep counts".to_string(),
        });
    }

    None
}

/// Histories for every exercise that currently has a recommendation.
pub fn get_all_overload_recommendations(
    sessions: &[WorkoutSession],
) -> BTreeMap<String, ExerciseHistory> {
    let names: BTreeSet<&str> = sessions
        .iter()
        .flat_map(|s| s.exercises.iter().map(|e| e.exercise_name.as_str()))
        .collect();

    names
        .into_iter()
        .filter_map(|name| analyze_exercise_progression(name, sessions, RepRange::default()))
        .filter(|history| history.recommendation.is_some())
        .map(|history| (history.exercise_name.clone(), history))
        .collect()
}

pub fn get_workout_overload_info(
    exercise_name: &str,
    sessions: &[WorkoutSession],
) -> Option<OverloadInfo> {
    let history = analyze_exercise_progression(exercise_name, sessions, RepRange::default())?;
    let start = history.sessions.len().saturating_sub(RECENT_SESSIONS);

    Some(OverloadInfo {
        last_three_sessions: history.sessions[start..].to_vec(),
        recommendation: history.recommendation,
    })
}
