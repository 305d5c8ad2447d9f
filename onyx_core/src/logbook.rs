//! Day logging operations.
//!
//! Each (date, exercise) pair has at most one workout log. Logging again on
//! the same day updates that log in place, and skipping toggles between a
//! skipped log and no log at all.

use crate::records::{compute_personal_record, is_new_record, max_weight};
use crate::store::Store;
use crate::{
    BodyPart, BodyWeight, CardioKind, CardioLog, Error, ExerciseId, LogStatus, Measurement,
    PlannedSet, Result, SetEntry, WorkoutLog,
};
use chrono::NaiveDate;
use uuid::Uuid;

/// Outcome of [`log_exercise`]
#[derive(Clone, Debug)]
pub struct LoggedExercise {
    pub log: WorkoutLog,
    /// Record before this log was saved (0 when there was none)
    pub previous_record: f64,
    pub new_record: bool,
}

/// Outcome of [`toggle_skip`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipOutcome {
    Skipped,
    Unskipped,
}

fn day_log<S: Store + ?Sized>(
    store: &S,
    date: NaiveDate,
    exercise_id: &ExerciseId,
) -> Result<Option<WorkoutLog>> {
    Ok(store
        .list_logs(Some(exercise_id))?
        .into_iter()
        .find(|log| log.date == date))
}

fn ensure_exercise<S: Store + ?Sized>(store: &S, exercise_id: &ExerciseId) -> Result<()> {
    if store.list_exercises()?.iter().any(|e| &e.id == exercise_id) {
        Ok(())
    } else {
        Err(Error::NotFound(format!("exercise {}", exercise_id)))
    }
}

/// Save the sets performed for an exercise on `date`
///
/// Sets without a weight are dropped. The record check compares against
/// every other log of the exercise, so re-logging the same day does not
/// count the day against itself.
pub fn log_exercise<S: Store + ?Sized>(
    store: &mut S,
    date: NaiveDate,
    exercise_id: &ExerciseId,
    sets: Vec<PlannedSet>,
) -> Result<LoggedExercise> {
    let entries: Vec<SetEntry> = sets.into_iter().filter_map(PlannedSet::to_entry).collect();
    if entries.is_empty() {
        return Err(Error::Validation("no sets with a weight to log".to_string()));
    }
    ensure_exercise(store, exercise_id)?;

    let history = store.list_logs(Some(exercise_id))?;
    let existing = history.iter().find(|log| log.date == date);
    let others: Vec<WorkoutLog> = history
        .iter()
        .filter(|log| log.date != date)
        .cloned()
        .collect();
    let previous_record = compute_personal_record(&others, exercise_id);
    let new_max = max_weight(&entries);

    let log = match existing {
        Some(log) => WorkoutLog {
            status: LogStatus::Completed(entries),
            ..log.clone()
        },
        None => WorkoutLog::completed(date, exercise_id.clone(), entries),
    };
    store.upsert_log(&log)?;

    let new_record = is_new_record(new_max, previous_record);
    tracing::info!(
        "Logged {} sets of {} on {} (max {}, record {})",
        log.sets().len(),
        exercise_id,
        date,
        new_max,
        previous_record
    );

    Ok(LoggedExercise {
        log,
        previous_record,
        new_record,
    })
}

/// Skip an exercise for the day, or undo the skip
///
/// Un-skipping deletes the skipped log so the exercise is pending again.
pub fn toggle_skip<S: Store + ?Sized>(
    store: &mut S,
    date: NaiveDate,
    exercise_id: &ExerciseId,
) -> Result<SkipOutcome> {
    ensure_exercise(store, exercise_id)?;

    match day_log(store, date, exercise_id)? {
        Some(log) if log.is_skipped() => {
            store.delete_log(log.id)?;
            tracing::info!("Unskipped {} on {}", exercise_id, date);
            Ok(SkipOutcome::Unskipped)
        }
        Some(log) => {
            store.upsert_log(&WorkoutLog {
                status: LogStatus::Skipped,
                ..log
            })?;
            tracing::info!("Skipped {} on {} (replacing logged sets)", exercise_id, date);
            Ok(SkipOutcome::Skipped)
        }
        None => {
            store.upsert_log(&WorkoutLog::skipped(date, exercise_id.clone()))?;
            tracing::info!("Skipped {} on {}", exercise_id, date);
            Ok(SkipOutcome::Skipped)
        }
    }
}

pub fn delete_log<S: Store + ?Sized>(store: &mut S, id: Uuid) -> Result<()> {
    store.delete_log(id)?;
    tracing::info!("Deleted workout log {}", id);
    Ok(())
}

fn positive(value: f64, what: &str) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::Validation(format!("{} must be positive, got {}", what, value)))
    }
}

pub fn log_cardio<S: Store + ?Sized>(
    store: &mut S,
    date: NaiveDate,
    kind: CardioKind,
    duration_minutes: u32,
    distance: Option<f64>,
) -> Result<CardioLog> {
    if duration_minutes == 0 {
        return Err(Error::Validation("duration must be at least one minute".to_string()));
    }
    let distance = distance.map(|d| positive(d, "distance")).transpose()?;

    let log = CardioLog {
        id: Uuid::new_v4(),
        date,
        kind,
        duration_minutes,
        distance,
    };
    store.add_cardio(&log)?;
    tracing::info!("Logged {} min of {} on {}", duration_minutes, kind.label(), date);
    Ok(log)
}

/// Record body weight for a date, replacing that date's entry
pub fn record_body_weight<S: Store + ?Sized>(
    store: &mut S,
    date: NaiveDate,
    weight: f64,
) -> Result<BodyWeight> {
    let entry = BodyWeight {
        id: Uuid::new_v4(),
        date,
        weight: positive(weight, "body weight")?,
    };
    store.upsert_body_weight(&entry)?;
    Ok(entry)
}

pub fn record_measurement<S: Store + ?Sized>(
    store: &mut S,
    date: NaiveDate,
    body_part: BodyPart,
    value: f64,
) -> Result<Measurement> {
    let measurement = Measurement {
        id: Uuid::new_v4(),
        date,
        body_part,
        value: positive(value, "measurement")?,
    };
    store.add_measurement(&measurement)?;
    Ok(measurement)
}
