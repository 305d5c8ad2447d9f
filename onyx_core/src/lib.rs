#![forbid(unsafe_code)]

//! Core domain model and business logic for the Onyx workout tracker.
//!
//! This crate provides:
//! - Domain types (exercises, workout logs, routines, body tracking)
//! - Last-performance projection and personal records
//! - Plate loading
//! - Day planning and logging operations
//! - Persistence (file store, retry wrapper, local overrides)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod plates;
pub mod history;
pub mod records;
pub mod state;
pub mod store;
pub mod file_store;
pub mod retry;
pub mod trends;
pub mod schedule;
pub mod logbook;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use history::{project_last_performance, LastPerformance};
pub use records::{compute_personal_record, is_new_record};
pub use plates::{solve_plates, PlateResult};
pub use store::{MemoryStore, Store};
pub use file_store::FileStore;
pub use retry::RetryingStore;
pub use schedule::{plan_day, DayInputs, DayPlan, ExerciseStatus};
pub use logbook::{log_exercise, toggle_skip, LoggedExercise, SkipOutcome};
