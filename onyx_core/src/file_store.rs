//! File-backed store.
//!
//! Each table is a JSON array in its own file under the data directory.
//! Mutations run under an exclusive lock on a directory-wide lock file so
//! concurrent CLI invocations serialize their read-modify-write cycles.
//! Records that fail to parse are logged and skipped on read and written
//! back untouched on the next write; a table whose file is
//! not a JSON array at all is reported as a storage error rather than
//! silently replaced.

use crate::state::{lock_dir, read_locked, write_atomic};
use crate::store::{rules, Store};
use crate::{
    catalog, BodyWeight, CardioLog, Error, Exercise, ExerciseId, Measurement, Result, Routine,
    WorkoutLog,
};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const EXERCISES: &str = "exercises.json";
const LOGS: &str = "workout_logs.json";
const ROUTINES: &str = "routines.json";
const CARDIO: &str = "cardio_logs.json";
const BODY_WEIGHTS: &str = "body_weights.json";
const MEASUREMENTS: &str = "measurements.json";

/// Store keeping one JSON file per table
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir` (created on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, table: &str) -> PathBuf {
        self.dir.join(table)
    }

    /// Read a table; `None` when its file doesn't exist yet
    fn read_table<T: DeserializeOwned>(&self, table: &str) -> Result<Option<Table<T>>> {
        let path = self.path(table);
        let Some(contents) = read_locked(&path)? else {
            return Ok(None);
        };
        if contents.trim().is_empty() {
            return Ok(Some(Table::default()));
        }

        let values: Vec<serde_json::Value> = serde_json::from_str(&contents)
            .map_err(|e| Error::Storage(format!("{:?} is not a valid table: {}", path, e)))?;

        let mut parsed = Table::default();
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<T>(value.clone()) {
                Ok(record) => parsed.records.push(record),
                Err(e) => {
                    tracing::warn!("Skipping record {} in {:?}: {}", index, path, e);
                    parsed.unreadable.push(value);
                }
            }
        }

        tracing::debug!(
            "Read {} records from {:?} ({} unreadable)",
            parsed.records.len(),
            path,
            parsed.unreadable.len()
        );
        Ok(Some(parsed))
    }

    fn load_table<T: DeserializeOwned>(&self, table: &str) -> Result<Table<T>> {
        Ok(self.read_table(table)?.unwrap_or_default())
    }

    fn load<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        Ok(self.load_table(table)?.records)
    }

    fn load_exercise_table(&self, table: &str) -> Result<Table<Exercise>> {
        Ok(self.read_table(table)?.unwrap_or_else(|| Table {
            records: catalog::default_exercises().to_vec(),
            unreadable: Vec::new(),
        }))
    }

    fn load_exercises(&self) -> Result<Vec<Exercise>> {
        Ok(self.load_exercise_table(EXERCISES)?.records)
    }

    /// Load a table, apply `f`, and write it back while holding the lock
    ///
    /// Records that could not be read are written back untouched after the
    /// rest.
    fn mutate<T, F>(&self, table: &str, load: fn(&Self, &str) -> Result<Table<T>>, f: F) -> Result<()>
    where
        T: Serialize,
        F: FnOnce(&mut Vec<T>) -> Result<()>,
    {
        std::fs::create_dir_all(&self.dir)?;
        let lock = lock_dir(&self.dir)?;

        let result = load(self, table).and_then(|mut parsed| {
            f(&mut parsed.records)?;
            let mut values = parsed
                .records
                .iter()
                .map(serde_json::to_value)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            values.append(&mut parsed.unreadable);
            write_atomic(&self.path(table), &values)
        });

        lock.unlock()?;
        result
    }
}

/// Parsed records of a table plus the raw records that failed to parse
struct Table<T> {
    records: Vec<T>,
    unreadable: Vec<serde_json::Value>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            unreadable: Vec::new(),
        }
    }
}

impl Store for FileStore {
    fn list_exercises(&self) -> Result<Vec<Exercise>> {
        self.load_exercises()
    }

    fn add_exercise(&mut self, exercise: &Exercise) -> Result<()> {
        self.mutate(
            EXERCISES,
            Self::load_exercise_table,
            |exercises| rules::add_exercise(exercises, exercise),
        )?;
        tracing::info!("Added exercise {} ({})", exercise.name, exercise.id);
        Ok(())
    }

    fn list_logs(&self, exercise_id: Option<&ExerciseId>) -> Result<Vec<WorkoutLog>> {
        let mut logs: Vec<WorkoutLog> = self.load(LOGS)?;
        if let Some(id) = exercise_id {
            logs.retain(|l| &l.exercise_id == id);
        }
        Ok(logs)
    }

    fn upsert_log(&mut self, log: &WorkoutLog) -> Result<()> {
        self.mutate(LOGS, Self::load_table, |logs| {
            rules::upsert_log(logs, log);
            Ok(())
        })?;
        tracing::debug!("Saved workout log {}", log.id);
        Ok(())
    }

    fn delete_log(&mut self, id: Uuid) -> Result<()> {
        self.mutate(LOGS, Self::load_table, |logs: &mut Vec<WorkoutLog>| {
            rules::remove_by_id(logs, id, |l| l.id, "workout log")
        })
    }

    fn list_routines(&self) -> Result<Vec<Routine>> {
        self.load(ROUTINES)
    }

    fn save_routine(&mut self, routine: &Routine) -> Result<()> {
        self.mutate(ROUTINES, Self::load_table, |routines| {
            rules::save_routine(routines, routine);
            Ok(())
        })?;
        tracing::info!("Saved routine {} for {}", routine.name, routine.day);
        Ok(())
    }

    fn delete_routine(&mut self, id: Uuid) -> Result<()> {
        self.mutate(ROUTINES, Self::load_table, |routines: &mut Vec<Routine>| {
            rules::remove_by_id(routines, id, |r| r.id, "routine")
        })
    }

    fn list_cardio(&self) -> Result<Vec<CardioLog>> {
        self.load(CARDIO)
    }

    fn add_cardio(&mut self, log: &CardioLog) -> Result<()> {
        self.mutate(CARDIO, Self::load_table, |logs| {
            logs.push(log.clone());
            Ok(())
        })
    }

    fn delete_cardio(&mut self, id: Uuid) -> Result<()> {
        self.mutate(CARDIO, Self::load_table, |logs: &mut Vec<CardioLog>| {
            rules::remove_by_id(logs, id, |c| c.id, "cardio log")
        })
    }

    fn list_body_weights(&self) -> Result<Vec<BodyWeight>> {
        self.load(BODY_WEIGHTS)
    }

    fn upsert_body_weight(&mut self, entry: &BodyWeight) -> Result<()> {
        self.mutate(BODY_WEIGHTS, Self::load_table, |entries| {
            rules::upsert_body_weight(entries, entry);
            Ok(())
        })
    }

    fn delete_body_weight(&mut self, id: Uuid) -> Result<()> {
        self.mutate(BODY_WEIGHTS, Self::load_table, |entries: &mut Vec<BodyWeight>| {
            rules::remove_by_id(entries, id, |b| b.id, "body weight")
        })
    }

    fn list_measurements(&self) -> Result<Vec<Measurement>> {
        self.load(MEASUREMENTS)
    }

    fn add_measurement(&mut self, measurement: &Measurement) -> Result<()> {
        self.mutate(MEASUREMENTS, Self::load_table, |entries| {
            entries.push(measurement.clone());
            Ok(())
        })
    }

    fn delete_measurement(&mut self, id: Uuid) -> Result<()> {
        self.mutate(MEASUREMENTS, Self::load_table, |entries: &mut Vec<Measurement>| {
            rules::remove_by_id(entries, id, |m| m.id, "measurement")
        })
    }
}
