//! Core domain types for Onyx.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and their identifiers
//! - Lifting sets and workout logs (completed or skipped)
//! - Weekly routines and planned cardio
//! - Cardio sessions, body weight and circumference measurements
//! - Unit systems and per-date overrides

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque exercise identifier.
///
/// Storage has carried both numeric and string ids over time; both are
/// normalized to this type when a record is deserialized, and compared
/// exactly everywhere else.
#[derive(Clone, Debug, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ExerciseId(String);

impl ExerciseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh id for a user-created exercise
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExerciseId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for ExerciseId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ExerciseId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => ExerciseId::from(n),
            RawId::Text(s) => ExerciseId::new(s.trim()),
        })
    }
}

// ============================================================================
// Exercise Types
// ============================================================================

/// An exercise definition (e.g., "Bench Press")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub category: String,
}

// ============================================================================
// Set and Log Types
// ============================================================================

/// A single resistance-training set
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct SetEntry {
    pub weight: f64,
    pub reps: u32,
}

impl SetEntry {
    pub fn new(weight: f64, reps: u32) -> Self {
        Self { weight, reps }
    }
}

impl<'de> Deserialize<'de> for SetEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = SetRecord::deserialize(deserializer)?;
        Ok(record.into_entry())
    }
}

/// Outcome of an exercise on a given day
#[derive(Clone, Debug, PartialEq)]
pub enum LogStatus {
    /// The exercise was performed with these sets
    Completed(Vec<SetEntry>),
    /// The exercise was deliberately not performed
    Skipped,
}

impl LogStatus {
    /// Sets of a completed log; empty when skipped
    pub fn sets(&self) -> &[SetEntry] {
        match self {
            LogStatus::Completed(sets) => sets,
            LogStatus::Skipped => &[],
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, LogStatus::Skipped)
    }
}

/// One logged session of one exercise on one date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(from = "LogRecord", into = "LogRecord")]
pub struct WorkoutLog {
    pub id: Uuid,
    pub date: NaiveDate,
    pub exercise_id: ExerciseId,
    pub status: LogStatus,
}

impl WorkoutLog {
    pub fn completed(date: NaiveDate, exercise_id: ExerciseId, sets: Vec<SetEntry>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            exercise_id,
            status: LogStatus::Completed(sets),
        }
    }

    pub fn skipped(date: NaiveDate, exercise_id: ExerciseId) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            exercise_id,
            status: LogStatus::Skipped,
        }
    }

    pub fn sets(&self) -> &[SetEntry] {
        self.status.sets()
    }

    pub fn is_skipped(&self) -> bool {
        self.status.is_skipped()
    }
}

/// Stored shape of a workout log.
///
/// Skips are stored as a single `{"isSkipped": true}` set so that records
/// stay readable by the hosted tables; this is the only place that encoding
/// is known.
#[derive(Debug, Serialize, Deserialize)]
struct LogRecord {
    id: Uuid,
    date: NaiveDate,
    #[serde(alias = "exerciseId")]
    exercise_id: ExerciseId,
    #[serde(default)]
    sets: Vec<SetRecord>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SetRecord {
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    weight: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    reps: Option<f64>,
    #[serde(
        default,
        rename = "isSkipped",
        alias = "is_skipped",
        skip_serializing_if = "std::ops::Not::not"
    )]
    is_skipped: bool,
}

impl SetRecord {
    fn into_entry(self) -> SetEntry {
        SetEntry {
            weight: self.weight.unwrap_or(0.0),
            reps: self.reps.map(lenient::reps).unwrap_or(0),
        }
    }
}

impl From<LogRecord> for WorkoutLog {
    fn from(record: LogRecord) -> Self {
        let skipped = record.sets.first().is_some_and(|s| s.is_skipped);
        let status = if skipped {
            LogStatus::Skipped
        } else {
            LogStatus::Completed(record.sets.into_iter().map(SetRecord::into_entry).collect())
        };

        WorkoutLog {
            id: record.id,
            date: record.date,
            exercise_id: record.exercise_id,
            status,
        }
    }
}

impl From<WorkoutLog> for LogRecord {
    fn from(log: WorkoutLog) -> Self {
        let sets = match log.status {
            LogStatus::Skipped => vec![SetRecord {
                is_skipped: true,
                ..SetRecord::default()
            }],
            LogStatus::Completed(sets) => sets
                .into_iter()
                .map(|s| SetRecord {
                    weight: Some(s.weight),
                    reps: Some(f64::from(s.reps)),
                    is_skipped: false,
                })
                .collect(),
        };

        LogRecord {
            id: log.id,
            date: log.date,
            exercise_id: log.exercise_id,
            sets,
        }
    }
}

/// A set as entered for today: the weight may still be blank.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlannedSet {
    pub weight: Option<f64>,
    pub reps: u32,
}

impl PlannedSet {
    /// The loggable set, if a weight has been entered
    pub fn to_entry(self) -> Option<SetEntry> {
        self.weight.map(|w| SetEntry::new(w, self.reps))
    }
}

impl fmt::Display for PlannedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.weight {
            Some(w) => write!(f, "{}x{}", format_weight(w), self.reps),
            None => write!(f, "_x{}", self.reps),
        }
    }
}

impl FromStr for PlannedSet {
    type Err = crate::Error;

    /// Parse `WEIGHTxREPS` (e.g. `135x5`, `62.5x8`). A blank or `_`
    /// weight (`x10`, `_x10`) leaves the weight unset.
    fn from_str(s: &str) -> crate::Result<Self> {
        let (weight, reps) = s
            .trim()
            .to_lowercase()
            .split_once('x')
            .map(|(w, r)| (w.trim().to_string(), r.trim().to_string()))
            .ok_or_else(|| crate::Error::Validation(format!("expected WEIGHTxREPS, got '{}'", s)))?;

        let reps: u32 = reps
            .parse()
            .map_err(|_| crate::Error::Validation(format!("invalid reps in '{}'", s)))?;

        let weight = match weight.as_str() {
            "" | "_" => None,
            w => Some(
                w.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .ok_or_else(|| crate::Error::Validation(format!("invalid weight in '{}'", s)))?,
            ),
        };

        Ok(PlannedSet { weight, reps })
    }
}

/// Format a weight without a trailing `.0` (135, 62.5, 1.25)
pub fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 {
        format!("{:.0}", weight)
    } else {
        let s = format!("{:.2}", weight);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Coercion of loosely-typed numeric fields.
///
/// Partially entered records carry weights as strings, blanks or nulls.
/// Anything that does not read as a finite number becomes `0`.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Num(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let value = Option::<Loose>::deserialize(deserializer)?;
        Ok(Some(match value {
            Some(Loose::Num(n)) if n.is_finite() => n,
            Some(Loose::Text(s)) => parse_number(&s),
            _ => 0.0,
        }))
    }

    pub fn parse_number(s: &str) -> f64 {
        s.trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .unwrap_or(0.0)
    }

    pub fn reps(n: f64) -> u32 {
        if n.is_finite() && n > 0.0 {
            n.min(f64::from(u32::MAX)) as u32
        } else {
            0
        }
    }
}

// ============================================================================
// Routine Types
// ============================================================================

fn default_target_sets() -> u32 {
    3
}

fn default_target_reps() -> u32 {
    10
}

/// An exercise slot within a routine, with its targets
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoutineExercise {
    #[serde(alias = "id")]
    pub exercise_id: ExerciseId,
    #[serde(default = "default_target_sets")]
    pub sets: u32,
    #[serde(default = "default_target_reps")]
    pub reps: u32,
}

impl RoutineExercise {
    pub fn new(exercise_id: ExerciseId) -> Self {
        Self {
            exercise_id,
            sets: default_target_sets(),
            reps: default_target_reps(),
        }
    }
}

/// Kind of cardio activity
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CardioKind {
    Run,
    Walk,
    Cycle,
    Treadmill,
    Stairmaster,
    Rowing,
    Elliptical,
    #[serde(rename = "HIIT")]
    Hiit,
    Other,
}

impl CardioKind {
    pub const ALL: [CardioKind; 9] = [
        CardioKind::Run,
        CardioKind::Walk,
        CardioKind::Cycle,
        CardioKind::Treadmill,
        CardioKind::Stairmaster,
        CardioKind::Rowing,
        CardioKind::Elliptical,
        CardioKind::Hiit,
        CardioKind::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CardioKind::Run => "Run",
            CardioKind::Walk => "Walk",
            CardioKind::Cycle => "Cycle",
            CardioKind::Treadmill => "Treadmill",
            CardioKind::Stairmaster => "Stairmaster",
            CardioKind::Rowing => "Rowing",
            CardioKind::Elliptical => "Elliptical",
            CardioKind::Hiit => "HIIT",
            CardioKind::Other => "Other",
        }
    }
}

impl FromStr for CardioKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        CardioKind::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::Error::Validation(format!("unknown cardio type '{}'", s)))
    }
}

/// Cardio planned as part of a routine
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlannedCardio {
    #[serde(rename = "type")]
    pub kind: CardioKind,
    pub duration_minutes: u32,
    #[serde(default)]
    pub distance: Option<f64>,
}

/// A routine scheduled on one weekday
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Routine {
    pub id: Uuid,
    pub day: Weekday,
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<RoutineExercise>,
    #[serde(default)]
    pub cardio: Vec<PlannedCardio>,
}

impl Routine {
    /// A routine with nothing in it marks a scheduled rest day
    pub fn is_rest(&self) -> bool {
        self.exercises.is_empty() && self.cardio.is_empty()
    }
}

// ============================================================================
// Cardio and Body Tracking Types
// ============================================================================

/// A logged cardio session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CardioLog {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: CardioKind,
    pub duration_minutes: u32,
    #[serde(default)]
    pub distance: Option<f64>,
}

/// A body weight entry (one per date)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BodyWeight {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(deserialize_with = "lenient_required")]
    pub weight: f64,
}

fn lenient_required<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    lenient::number(deserializer).map(|n| n.unwrap_or(0.0))
}

/// Circumference measurement sites
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Waist,
    Chest,
    #[serde(rename = "Left Arm")]
    LeftArm,
    #[serde(rename = "Right Arm")]
    RightArm,
    #[serde(rename = "Left Thigh")]
    LeftThigh,
    #[serde(rename = "Right Thigh")]
    RightThigh,
    Calves,
    Neck,
    Shoulders,
    Hips,
}

impl BodyPart {
    pub const ALL: [BodyPart; 10] = [
        BodyPart::Waist,
        BodyPart::Chest,
        BodyPart::LeftArm,
        BodyPart::RightArm,
        BodyPart::LeftThigh,
        BodyPart::RightThigh,
        BodyPart::Calves,
        BodyPart::Neck,
        BodyPart::Shoulders,
        BodyPart::Hips,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BodyPart::Waist => "Waist",
            BodyPart::Chest => "Chest",
            BodyPart::LeftArm => "Left Arm",
            BodyPart::RightArm => "Right Arm",
            BodyPart::LeftThigh => "Left Thigh",
            BodyPart::RightThigh => "Right Thigh",
            BodyPart::Calves => "Calves",
            BodyPart::Neck => "Neck",
            BodyPart::Shoulders => "Shoulders",
            BodyPart::Hips => "Hips",
        }
    }
}

impl FromStr for BodyPart {
    type Err = crate::Error;

    /// Accepts labels with spaces, dashes or underscores ("left-arm")
    fn from_str(s: &str) -> crate::Result<Self> {
        let wanted = s.trim().replace(['-', '_'], " ");
        BodyPart::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| crate::Error::Validation(format!("unknown body part '{}'", s)))
    }
}

/// A circumference measurement
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Measurement {
    pub id: Uuid,
    pub date: NaiveDate,
    pub body_part: BodyPart,
    #[serde(alias = "measurement", deserialize_with = "lenient_required")]
    pub value: f64,
}

// ============================================================================
// Units
// ============================================================================

/// Unit system for lifted and body weight
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WeightUnit::Lbs => "lbs",
            WeightUnit::Kg => "kg",
        })
    }
}

impl FromStr for WeightUnit {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lbs" | "lb" => Ok(WeightUnit::Lbs),
            "kg" | "kgs" => Ok(WeightUnit::Kg),
            other => Err(crate::Error::Validation(format!("unknown weight unit '{}'", other))),
        }
    }
}

/// Unit for circumference measurements
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MeasureUnit {
    #[default]
    In,
    Cm,
}

impl fmt::Display for MeasureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MeasureUnit::In => "in",
            MeasureUnit::Cm => "cm",
        })
    }
}

/// Unit for cardio distance
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Mi,
    Km,
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DistanceUnit::Mi => "mi",
            DistanceUnit::Km => "km",
        })
    }
}

// ============================================================================
// Per-date overrides
// ============================================================================

/// Device-local schedule overrides keyed by date
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct DayOverrides {
    /// Dates marked as unplanned rest
    #[serde(default)]
    pub rest_days: BTreeSet<NaiveDate>,
    /// Dates whose weekday routine is replaced by another routine
    #[serde(default)]
    pub swaps: BTreeMap<NaiveDate, Uuid>,
}

impl DayOverrides {
    pub fn is_rest(&self, date: NaiveDate) -> bool {
        self.rest_days.contains(&date)
    }

    /// Flip the ad-hoc rest flag for a date, returning the new value
    pub fn toggle_rest(&mut self, date: NaiveDate) -> bool {
        if self.rest_days.remove(&date) {
            false
        } else {
            self.rest_days.insert(date);
            true
        }
    }

    pub fn swap(&mut self, date: NaiveDate, routine_id: Uuid) {
        self.swaps.insert(date, routine_id);
    }

    /// Drop a swap, returning whether one existed
    pub fn revert_swap(&mut self, date: NaiveDate) -> bool {
        self.swaps.remove(&date).is_some()
    }
}
