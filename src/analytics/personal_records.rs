use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::models::{CurrentSet, PersonalRecord, PrType, PrUpdate, WorkoutSession};

/// Best weight and best reps per exercise across every session.
///
/// Only completed sets with a non-zero weight count. Reps ties go to the
/// heavier set. `total_sessions` only grows when a session dated strictly
/// after `last_performed` is folded in, so same-day sessions and
/// out-of-order input are undercounted.
pub fn calculate_personal_records(
    sessions: &[WorkoutSession],
) -> BTreeMap<String, PersonalRecord> {
    let mut records: BTreeMap<String, PersonalRecord> = BTreeMap::new();

    for session in sessions {
        for exercise in &session.exercises {
            for set in exercise.completed().filter(|set| set.weight != 0.0) {
                match records.get_mut(&exercise.exercise_name) {
                    None => {
                        records.insert(
                            exercise.exercise_name.clone(),
                            PersonalRecord {
                                exercise_name: exercise.exercise_name.clone(),
                                max_weight: set.weight,
                                max_weight_reps: set.reps,
                                max_weight_date: session.date,
                                max_weight_session_id: session.id.clone(),
                                max_reps: set.reps,
                                max_reps_weight: set.weight,
                                max_reps_date: session.date,
                                max_reps_session_id: session.id.clone(),
                                total_sets: 1,
                                total_sessions: 1,
                                last_performed: session.date,
                            },
                        );
                    }
                    Some(record) => {
                        if set.weight > record.max_weight {
                            record.max_weight = set.weight;
                            record.max_weight_reps = set.reps;
                            record.max_weight_date = session.date;
                            record.max_weight_session_id = session.id.clone();
                        }

                        if beats_reps(set.reps, set.weight, record) {
                            record.max_reps = set.reps;
                            record.max_reps_weight = set.weight;
                            record.max_reps_date = session.date;
                            record.max_reps_session_id = session.id.clone();
                        }

                        record.total_sets += 1;
                        if session.date > record.last_performed {
                            record.last_performed = session.date;
                            record.total_sessions += 1;
                        }
                    }
                }
            }
        }
    }

    records
}

fn beats_reps(reps: u32, weight: f64, record: &PersonalRecord) -> bool {
    reps > record.max_reps || (reps == record.max_reps && weight > record.max_reps_weight)
}

/// Sets from an in-progress session that can count toward a record.
pub fn flatten_session_sets(session: &WorkoutSession) -> Vec<CurrentSet> {
    session
        .exercises
        .iter()
        .flat_map(|exercise| {
            exercise
                .completed()
                .filter(|set| set.weight != 0.0)
                .map(|set| CurrentSet::new(exercise.exercise_name.clone(), set.weight, set.reps))
        })
        .collect()
}

/// Compare the sets just performed against records built from earlier
/// sessions. `existing` must not include the session being checked.
///
/// Returns at most one update per exercise, in the order exercises first
/// appear. Exercises with no prior record are skipped.
pub fn check_for_new_prs(
    current_sets: &[CurrentSet],
    existing: &BTreeMap<String, PersonalRecord>,
) -> Vec<PrUpdate> {
    let mut updates: Vec<PrUpdate> = Vec::new();

    for set in current_sets {
        let Some(record) = existing.get(&set.exercise_name) else {
            continue;
        };

        let weight_pr = set.weight > record.max_weight;
        let reps_pr = beats_reps(set.reps, set.weight, record);
        if !weight_pr && !reps_pr {
            continue;
        }

        let index = match updates
            .iter()
            .position(|u| u.exercise_name == set.exercise_name)
        {
            Some(index) => index,
            None => {
                updates.push(PrUpdate {
                    exercise_name: set.exercise_name.clone(),
                    pr_type: PrType::Weight,
                    previous_weight: None,
                    new_weight: None,
                    previous_reps: None,
                    new_reps: None,
                });
                updates.len() - 1
            }
        };
        let update = &mut updates[index];

        if weight_pr {
            update.previous_weight = Some(record.max_weight);
            update.new_weight = Some(update.new_weight.map_or(set.weight, |w| w.max(set.weight)));
        }
        if reps_pr {
            update.previous_reps = Some(record.max_reps);
            update.new_reps = Some(update.new_reps.map_or(set.reps, |r| r.max(set.reps)));
        }

        update.pr_type = match (update.new_weight.is_some(), update.new_reps.is_some()) {
            (true, true) => PrType::Both,
            (false, true) => PrType::Reps,
            _ => PrType::Weight,
        };
    }

    updates
}

/// Relative label for when a record was set.
pub fn format_pr_date(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff_ms = (now - date).num_milliseconds().unsigned_abs();
    let day_ms = 24 * 60 * 60 * 1000;
    let diff_days = diff_ms.div_ceil(day_ms);

    match diff_days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{} days ago", diff_days),
        7..=29 => format!("{} weeks ago", diff_days / 7),
        30..=364 => format!("{} months ago", diff_days / 30),
        _ => date.format("%-m/%-d/%Y").to_string(),
    }
}
