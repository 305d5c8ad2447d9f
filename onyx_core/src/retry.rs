//! Retry-once policy for the data layer.
//!
//! A failed data call waits a fixed delay and is tried exactly once more.
//! If the second attempt fails too, its error goes to the caller unchanged.
//! Only transient failures (I/O) are retried; a missing record or a
//! rejected input fails the same way every time.

use crate::store::Store;
use crate::{BodyWeight, CardioLog, Exercise, ExerciseId, Measurement, Result, Routine, WorkoutLog};
use std::time::Duration;
use uuid::Uuid;

/// Run `op`, retrying once after `delay` on a transient failure
pub fn retry_once<T, F>(delay: Duration, label: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    match op() {
        Err(e) if e.is_transient() => {
            tracing::warn!("{} failed: {}. Retrying in {:?}", label, e, delay);
            std::thread::sleep(delay);
            op().inspect_err(|e| tracing::warn!("{} failed again: {}", label, e))
        }
        other => other,
    }
}

/// Store wrapper applying [`retry_once`] to every call
#[derive(Clone, Debug)]
pub struct RetryingStore<S> {
    inner: S,
    delay: Duration,
}

impl<S: Store> RetryingStore<S> {
    pub fn new(inner: S, delay: Duration) -> Self {
        Self { inner, delay }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Store> Store for RetryingStore<S> {
    fn list_exercises(&self) -> Result<Vec<Exercise>> {
        retry_once(self.delay, "list_exercises", || self.inner.list_exercises())
    }

    fn add_exercise(&mut self, exercise: &Exercise) -> Result<()> {
        let delay = self.delay;
        retry_once(delay, "add_exercise", || self.inner.add_exercise(exercise))
    }

    fn list_logs(&self, exercise_id: Option<&ExerciseId>) -> Result<Vec<WorkoutLog>> {
        retry_once(self.delay, "list_logs", || self.inner.list_logs(exercise_id))
    }

    fn upsert_log(&mut self, log: &WorkoutLog) -> Result<()> {
        let delay = self.delay;
        retry_once(delay, "upsert_log", || self.inner.upsert_log(log))
    }

    fn delete_log(&mut self, id: Uuid) -> Result<()> {
        let delay = self.delay;
        retry_once(delay, "delete_log", || self.inner.delete_log(id))
    }

    fn list_routines(&self) -> Result<Vec<Routine>> {
        retry_once(self.delay, "list_routines", || self.inner.list_routines())
    }

    fn save_routine(&mut self, routine: &Routine) -> Result<()> {
        let delay = self.delay;
        retry_once(delay, "save_routine", || self.inner.save_routine(routine))
    }

    fn delete_routine(&mut self, id: Uuid) -> Result<()> {
        let delay = self.delay;
        retry_once(delay, "delete_routine", || self.inner.delete_routine(id))
    }

    fn list_cardio(&self) -> Result<Vec<CardioLog>> {
        retry_once(self.delay, "list_cardio", || self.inner.list_cardio())
    }

    fn add_cardio(&mut self, log: &CardioLog) -> Result<()> {
        let delay = self.delay;
        retry_once(delay, "add_cardio", || self.inner.add_cardio(log))
    }

    fn delete_cardio(&mut self, id: Uuid) -> Result<()> {
        let delay = self.delay;
        retry_once(delay, "delete_cardio", || self.inner.delete_cardio(id))
    }

    fn list_body_weights(&self) -> Result<Vec<BodyWeight>> {
        retry_once(self.delay, "list_body_weights", || self.inner.list_body_weights())
    }

    fn upsert_body_weight(&mut self, entry: &BodyWeight) -> Result<()> {
        let delay = self.delay;
        retry_once(delay, "upsert_body_weight", || self.inner.upsert_body_weight(entry))
    }

    fn delete_body_weight(&mut self, id: Uuid) -> Result<()> {
        let delay = self.delay;
        retry_once(delay, "delete_body_weight", || self.inner.delete_body_weight(id))
    }

    fn list_measurements(&self) -> Result<Vec<Measurement>> {
        retry_once(self.delay, "list_measurements", || self.inner.list_measurements())
    }

    fn add_measurement(&mut self, measurement: &Measurement) -> Result<()> {
        let delay = self.delay;
        retry_once(delay, "add_measurement", || self.inner.add_measurement(measurement))
    }

    fn delete_measurement(&mut self, id: Uuid) -> Result<()> {
        let delay = self.delay;
        retry_once(delay, "delete_measurement", || self.inner.delete_measurement(id))
    }
}
