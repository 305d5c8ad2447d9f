//! Personal record tracking.

use crate::{ExerciseId, SetEntry, WorkoutLog};
use std::collections::HashMap;

/// Heaviest weight across a list of sets, `0` when empty
pub fn max_weight(sets: &[SetEntry]) -> f64 {
    sets.iter().map(|s| s.weight).fold(0.0, f64::max)
}

/// Heaviest weight ever logged for an exercise, skipped days excluded
pub fn compute_personal_record(logs: &[WorkoutLog], exercise_id: &ExerciseId) -> f64 {
    logs.iter()
        .filter(|log| &log.exercise_id == exercise_id && !log.is_skipped())
        .map(|log| max_weight(log.sets()))
        .fold(0.0, f64::max)
}

/// Records for every exercise that has logs
pub fn personal_records(logs: &[WorkoutLog]) -> HashMap<ExerciseId, f64> {
    let mut records = HashMap::new();
    for log in logs.iter().filter(|log| !log.is_skipped()) {
        let best = records.entry(log.exercise_id.clone()).or_insert(0.0);
        *best = f64::max(*best, max_weight(log.sets()));
    }
    records
}

/// Whether `new_max` beats an existing record.
///
/// A first-ever entry (prior record of 0) never counts.
pub fn is_new_record(new_max: f64, prior_record: f64) -> bool {
    new_max > prior_record && prior_record > 0.0
}
