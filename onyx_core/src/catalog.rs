//! Default exercise catalog and exercise lookup.
//!
//! A fresh install starts with five barbell staples; users add their own
//! exercises on top.

use crate::{Error, Exercise, ExerciseId, Result};
use once_cell::sync::Lazy;

/// Cached default exercises - built once and reused across all operations
static DEFAULT_EXERCISES: Lazy<Vec<Exercise>> = Lazy::new(|| {
    [
        (1, "Squat", "Legs"),
        (2, "Bench Press", "Chest"),
        (3, "Deadlift", "Back"),
        (4, "Overhead Press", "Shoulders"),
        (5, "Pull Up", "Back"),
    ]
    .into_iter()
    .map(|(id, name, category)| Exercise {
        id: ExerciseId::from(id),
        name: name.into(),
        category: category.into(),
    })
    .collect()
});

/// Get a reference to the built-in exercises
pub fn default_exercises() -> &'static [Exercise] {
    &DEFAULT_EXERCISES
}

/// Find an exercise by exact id, then by case-insensitive name
pub fn find_exercise<'a>(exercises: &'a [Exercise], query: &str) -> Option<&'a Exercise> {
    let query = query.trim();
    exercises
        .iter()
        .find(|e| e.id.as_str() == query)
        .or_else(|| exercises.iter().find(|e| e.name.eq_ignore_ascii_case(query)))
}

/// Like [`find_exercise`], but a miss is an error
pub fn resolve_exercise<'a>(exercises: &'a [Exercise], query: &str) -> Result<&'a Exercise> {
    find_exercise(exercises, query)
        .ok_or_else(|| Error::NotFound(format!("exercise '{}'", query.trim())))
}

/// Build a custom exercise, rejecting blank or duplicate names
pub fn new_exercise(existing: &[Exercise], name: &str, category: &str) -> Result<Exercise> {
    let name = name.trim();
    let category = category.trim();

    if name.is_empty() {
        return Err(Error::Validation("exercise name must not be empty".into()));
    }
    if existing.iter().any(|e| e.name.eq_ignore_ascii_case(name)) {
        return Err(Error::Validation(format!("exercise '{}' already exists", name)));
    }

    Ok(Exercise {
        id: ExerciseId::generate(),
        name: name.to_string(),
        category: if category.is_empty() {
            "Other".to_string()
        } else {
            category.to_string()
        },
    })
}
