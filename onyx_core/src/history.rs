//! Last-performance lookup and set suggestions.
//!
//! Looks back through an exercise's logs for the most recent session before
//! a given date and derives the sets to pre-fill for the day being logged.

use crate::{ExerciseId, PlannedSet, SetEntry, WorkoutLog};
use chrono::NaiveDate;

/// Heaviest set of the most recent prior session
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LastPerformance {
    pub date: NaiveDate,
    pub weight: f64,
    pub reps: u32,
}

/// Find the best set of the last session strictly before `before`
///
/// Only completed logs of `exercise_id` count; skipped days and logs on or
/// after `before` are ignored. Within the session the heaviest set wins and
/// equal weights keep the first set logged.
pub fn project_last_performance(
    logs: &[WorkoutLog],
    exercise_id: &ExerciseId,
    before: NaiveDate,
) -> Option<LastPerformance> {
    let last = logs
        .iter()
        .filter(|log| {
            &log.exercise_id == exercise_id
                && log.date < before
                && !log.is_skipped()
                && !log.sets().is_empty()
        })
        .max_by_key(|log| log.date)?;

    let best = heaviest_set(last.sets())?;

    tracing::debug!(
        "Last performance for {} before {}: {}x{} on {}",
        exercise_id,
        before,
        best.weight,
        best.reps,
        last.date
    );

    Some(LastPerformance {
        date: last.date,
        weight: best.weight,
        reps: best.reps,
    })
}

/// Weight to suggest for today's sets, if the last session had one
pub fn suggested_weight(
    logs: &[WorkoutLog],
    exercise_id: &ExerciseId,
    before: NaiveDate,
) -> Option<f64> {
    project_last_performance(logs, exercise_id, before)
        .map(|last| last.weight)
        .filter(|w| *w > 0.0)
}

/// First set with the greatest weight
pub fn heaviest_set(sets: &[SetEntry]) -> Option<SetEntry> {
    let mut iter = sets.iter().copied();
    let first = iter.next()?;
    Some(iter.fold(first, |best, set| if set.weight > best.weight { set } else { best }))
}

/// Sets to pre-fill for an exercise on the day being logged
///
/// A completed log for that day is shown as logged. Otherwise the targets
/// are filled with the suggested weight (blank when there is no history).
pub fn prefill_sets(
    existing: Option<&WorkoutLog>,
    suggested: Option<f64>,
    target_sets: u32,
    target_reps: u32,
) -> Vec<PlannedSet> {
    if let Some(log) = existing.filter(|log| !log.is_skipped() && !log.sets().is_empty()) {
        return log
            .sets()
            .iter()
            .map(|s| PlannedSet {
                weight: Some(s.weight),
                reps: s.reps,
            })
            .collect();
    }

    (0..target_sets)
        .map(|_| PlannedSet {
            weight: suggested,
            reps: target_reps,
        })
        .collect()
}

/// Logs of one exercise, newest first
pub fn logs_for_exercise<'a>(logs: &'a [WorkoutLog], exercise_id: &ExerciseId) -> Vec<&'a WorkoutLog> {
    let mut matching: Vec<_> = logs
        .iter()
        .filter(|log| &log.exercise_id == exercise_id)
        .collect();
    matching.sort_by(|a, b| b.date.cmp(&a.date));
    matching
}
