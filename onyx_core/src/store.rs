//! Persistence boundary.
//!
//! Everything Onyx keeps lives behind the [`Store`] trait. Implementations
//! own record storage and nothing else: the one-log-per-day rule and other
//! bookkeeping live in `logbook`, and retries live in `retry`.

use crate::{
    catalog, BodyWeight, CardioLog, Error, Exercise, ExerciseId, Measurement, Result, Routine,
    WorkoutLog,
};
use uuid::Uuid;

/// Record storage for exercises, logs, routines and body tracking
pub trait Store {
    fn list_exercises(&self) -> Result<Vec<Exercise>>;
    fn add_exercise(&mut self, exercise: &Exercise) -> Result<()>;

    /// All workout logs, or only those of one exercise
    fn list_logs(&self, exercise_id: Option<&ExerciseId>) -> Result<Vec<WorkoutLog>>;
    /// Insert a log, or replace the log with the same id
    fn upsert_log(&mut self, log: &WorkoutLog) -> Result<()>;
    fn delete_log(&mut self, id: Uuid) -> Result<()>;

    fn list_routines(&self) -> Result<Vec<Routine>>;
    /// Insert a routine, replacing any with the same id or the same weekday
    fn save_routine(&mut self, routine: &Routine) -> Result<()>;
    fn delete_routine(&mut self, id: Uuid) -> Result<()>;

    fn list_cardio(&self) -> Result<Vec<CardioLog>>;
    fn add_cardio(&mut self, log: &CardioLog) -> Result<()>;
    fn delete_cardio(&mut self, id: Uuid) -> Result<()>;

    fn list_body_weights(&self) -> Result<Vec<BodyWeight>>;
    /// Insert an entry, replacing any entry on the same date
    fn upsert_body_weight(&mut self, entry: &BodyWeight) -> Result<()>;
    fn delete_body_weight(&mut self, id: Uuid) -> Result<()>;

    fn list_measurements(&self) -> Result<Vec<Measurement>>;
    fn add_measurement(&mut self, measurement: &Measurement) -> Result<()>;
    fn delete_measurement(&mut self, id: Uuid) -> Result<()>;
}

/// Table-level rules shared by store implementations
pub(crate) mod rules {
    use super::*;

    pub fn upsert_log(logs: &mut Vec<WorkoutLog>, log: &WorkoutLog) {
        match logs.iter_mut().find(|l| l.id == log.id) {
            Some(existing) => *existing = log.clone(),
            None => logs.push(log.clone()),
        }
    }

    pub fn save_routine(routines: &mut Vec<Routine>, routine: &Routine) {
        routines.retain(|r| r.id != routine.id && r.day != routine.day);
        routines.push(routine.clone());
    }

    pub fn upsert_body_weight(entries: &mut Vec<BodyWeight>, entry: &BodyWeight) {
        entries.retain(|e| e.id != entry.id && e.date != entry.date);
        entries.push(entry.clone());
    }

    pub fn add_exercise(exercises: &mut Vec<Exercise>, exercise: &Exercise) -> Result<()> {
        if exercises.iter().any(|e| e.id == exercise.id) {
            return Err(Error::Validation(format!(
                "exercise id {} already exists",
                exercise.id
            )));
        }
        exercises.push(exercise.clone());
        Ok(())
    }

    /// Remove the record with `id`, or fail with NotFound
    pub fn remove_by_id<T>(
        records: &mut Vec<T>,
        id: Uuid,
        id_of: impl Fn(&T) -> Uuid,
        what: &str,
    ) -> Result<()> {
        let before = records.len();
        records.retain(|r| id_of(r) != id);
        if records.len() == before {
            return Err(Error::NotFound(format!("{} {}", what, id)));
        }
        Ok(())
    }
}

/// In-memory store, seeded with the default exercises
#[derive(Clone, Debug)]
pub struct MemoryStore {
    exercises: Vec<Exercise>,
    logs: Vec<WorkoutLog>,
    routines: Vec<Routine>,
    cardio: Vec<CardioLog>,
    body_weights: Vec<BodyWeight>,
    measurements: Vec<Measurement>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            exercises: catalog::default_exercises().to_vec(),
            logs: Vec::new(),
            routines: Vec::new(),
            cardio: Vec::new(),
            body_weights: Vec::new(),
            measurements: Vec::new(),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn list_exercises(&self) -> Result<Vec<Exercise>> {
        Ok(self.exercises.clone())
    }

    fn add_exercise(&mut self, exercise: &Exercise) -> Result<()> {
        rules::add_exercise(&mut self.exercises, exercise)
    }

    fn list_logs(&self, exercise_id: Option<&ExerciseId>) -> Result<Vec<WorkoutLog>> {
        Ok(self
            .logs
            .iter()
            .filter(|l| exercise_id.map_or(true, |id| &l.exercise_id == id))
            .cloned()
            .collect())
    }

    fn upsert_log(&mut self, log: &WorkoutLog) -> Result<()> {
        rules::upsert_log(&mut self.logs, log);
        Ok(())
    }

    fn delete_log(&mut self, id: Uuid) -> Result<()> {
        rules::remove_by_id(&mut self.logs, id, |l| l.id, "workout log")
    }

    fn list_routines(&self) -> Result<Vec<Routine>> {
        Ok(self.routines.clone())
    }

    fn save_routine(&mut self, routine: &Routine) -> Result<()> {
        rules::save_routine(&mut self.routines, routine);
        Ok(())
    }

    fn delete_routine(&mut self, id: Uuid) -> Result<()> {
        rules::remove_by_id(&mut self.routines, id, |r| r.id, "routine")
    }

    fn list_cardio(&self) -> Result<Vec<CardioLog>> {
        Ok(self.cardio.clone())
    }

    fn add_cardio(&mut self, log: &CardioLog) -> Result<()> {
        self.cardio.push(log.clone());
        Ok(())
    }

    fn delete_cardio(&mut self, id: Uuid) -> Result<()> {
        rules::remove_by_id(&mut self.cardio, id, |c| c.id, "cardio log")
    }

    fn list_body_weights(&self) -> Result<Vec<BodyWeight>> {
        Ok(self.body_weights.clone())
    }

    fn upsert_body_weight(&mut self, entry: &BodyWeight) -> Result<()> {
        rules::upsert_body_weight(&mut self.body_weights, entry);
        Ok(())
    }

    fn delete_body_weight(&mut self, id: Uuid) -> Result<()> {
        rules::remove_by_id(&mut self.body_weights, id, |b| b.id, "body weight")
    }

    fn list_measurements(&self) -> Result<Vec<Measurement>> {
        Ok(self.measurements.clone())
    }

    fn add_measurement(&mut self, measurement: &Measurement) -> Result<()> {
        self.measurements.push(measurement.clone());
        Ok(())
    }

    fn delete_measurement(&mut self, id: Uuid) -> Result<()> {
        rules::remove_by_id(&mut self.measurements, id, |m| m.id, "measurement")
    }
}
