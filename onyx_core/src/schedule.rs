//! Day planning.
//!
//! Joins the weekly routines, the exercise list and the log history into a
//! plan for one date:
//! - Resolve the routine (swap override first, then the weekday routine)
//! - Mark each routine exercise pending, completed or skipped
//! - Attach last performance, personal record and pre-filled sets
//! - Match planned cardio against the day's cardio logs

use crate::history::{prefill_sets, project_last_performance, LastPerformance};
use crate::records::compute_personal_record;
use crate::{
    CardioLog, DayOverrides, Exercise, PlannedCardio, PlannedSet, Routine, WorkoutLog,
};
use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

/// Status of a routine exercise on the planned day
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExerciseStatus {
    Pending,
    Completed,
    Skipped,
}

/// One routine exercise as it stands on the planned day
#[derive(Clone, Debug)]
pub struct PlannedExercise {
    pub exercise: Exercise,
    pub target_sets: u32,
    pub target_reps: u32,
    pub status: ExerciseStatus,
    /// The day's log for this exercise, if any
    pub log_id: Option<Uuid>,
    pub last: Option<LastPerformance>,
    pub personal_record: f64,
    pub sets: Vec<PlannedSet>,
}

/// Planned cardio and whether it has been logged that day
#[derive(Clone, Debug)]
pub struct PlannedCardioStatus {
    pub plan: PlannedCardio,
    pub done: bool,
}

/// Everything shown for one date
#[derive(Clone, Debug)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub routine: Option<Routine>,
    pub is_swapped: bool,
    pub is_ad_hoc_rest: bool,
    pub exercises: Vec<PlannedExercise>,
    pub cardio: Vec<PlannedCardioStatus>,
    /// Cardio logged that day that no routine item accounts for
    pub unplanned_cardio: Vec<CardioLog>,
}

impl DayPlan {
    /// A routine exists for the day but has nothing in it
    pub fn is_scheduled_rest(&self) -> bool {
        self.routine.as_ref().is_some_and(Routine::is_rest)
    }

    pub fn has_routine(&self) -> bool {
        self.routine.is_some()
    }

    /// (completed, skipped, total) routine exercises
    pub fn progress(&self) -> (usize, usize, usize) {
        let count = |status| self.exercises.iter().filter(|e| e.status == status).count();
        (
            count(ExerciseStatus::Completed),
            count(ExerciseStatus::Skipped),
            self.exercises.len(),
        )
    }
}

/// Records the planner reads from
#[derive(Clone, Copy, Debug)]
pub struct DayInputs<'a> {
    pub routines: &'a [Routine],
    pub exercises: &'a [Exercise],
    pub logs: &'a [WorkoutLog],
    pub cardio: &'a [CardioLog],
}

/// Routine for a date and whether it came from a swap
///
/// A swap pointing at a routine that no longer exists falls back to the
/// weekday routine.
pub fn resolve_routine<'a>(
    date: NaiveDate,
    routines: &'a [Routine],
    overrides: &DayOverrides,
) -> Option<(&'a Routine, bool)> {
    if let Some(swapped_id) = overrides.swaps.get(&date) {
        if let Some(routine) = routines.iter().find(|r| &r.id == swapped_id) {
            return Some((routine, true));
        }
        tracing::warn!(
            "Swapped routine {} for {} no longer exists, using weekday routine",
            swapped_id,
            date
        );
    }

    routines
        .iter()
        .find(|r| r.day == date.weekday())
        .map(|r| (r, false))
}

/// Build the plan for `date`
pub fn plan_day(date: NaiveDate, inputs: DayInputs<'_>, overrides: &DayOverrides) -> DayPlan {
    let resolved = resolve_routine(date, inputs.routines, overrides);
    let day_logs: Vec<&WorkoutLog> = inputs.logs.iter().filter(|l| l.date == date).collect();
    let day_cardio: Vec<&CardioLog> = inputs.cardio.iter().filter(|c| c.date == date).collect();

    let Some((routine, is_swapped)) = resolved else {
        return DayPlan {
            date,
            routine: None,
            is_swapped: false,
            is_ad_hoc_rest: overrides.is_rest(date),
            exercises: Vec::new(),
            cardio: Vec::new(),
            unplanned_cardio: day_cardio.into_iter().cloned().collect(),
        };
    };

    let exercises = routine
        .exercises
        .iter()
        .filter_map(|slot| {
            let Some(exercise) = inputs.exercises.iter().find(|e| e.id == slot.exercise_id) else {
                tracing::warn!(
                    "Routine {} references unknown exercise {}",
                    routine.name,
                    slot.exercise_id
                );
                return None;
            };

            let existing = day_logs.iter().copied().find(|l| l.exercise_id == exercise.id);
            let status = match existing {
                Some(log) if log.is_skipped() => ExerciseStatus::Skipped,
                Some(_) => ExerciseStatus::Completed,
                None => ExerciseStatus::Pending,
            };

            let last = project_last_performance(inputs.logs, &exercise.id, date);
            let suggested = last.map(|l| l.weight).filter(|w| *w > 0.0);

            Some(PlannedExercise {
                exercise: exercise.clone(),
                target_sets: slot.sets,
                target_reps: slot.reps,
                status,
                log_id: existing.map(|l| l.id),
                last,
                personal_record: compute_personal_record(inputs.logs, &exercise.id),
                sets: prefill_sets(existing, suggested, slot.sets, slot.reps),
            })
        })
        .collect();

    let cardio = routine
        .cardio
        .iter()
        .map(|plan| PlannedCardioStatus {
            plan: plan.clone(),
            done: day_cardio.iter().any(|c| c.kind == plan.kind),
        })
        .collect();

    let unplanned_cardio = day_cardio
        .into_iter()
        .filter(|c| !routine.cardio.iter().any(|plan| plan.kind == c.kind))
        .cloned()
        .collect();

    DayPlan {
        date,
        routine: Some(routine.clone()),
        is_swapped,
        is_ad_hoc_rest: overrides.is_rest(date),
        exercises,
        cardio,
        unplanned_cardio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog, CardioKind, ExerciseId, RoutineExercise, SetEntry};
    use chrono::Weekday;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn routine(day: Weekday, name: &str, exercise_ids: &[u64]) -> Routine {
        Routine {
            id: Uuid::new_v4(),
            day,
            name: name.into(),
            exercises: exercise_ids
                .iter()
                .map(|&id| RoutineExercise {
                    exercise_id: ExerciseId::from(id),
                    sets: 3,
                    reps: 5,
                })
                .collect(),
            cardio: vec![PlannedCardio {
                kind: CardioKind::Walk,
                duration_minutes: 20,
                distance: None,
            }],
        }
    }

    // 2024-03-04 is a Monday
    const MONDAY: &str = "2024-03-04";

    #[test]
    fn test_weekday_routine_resolved() {
        let routines = vec![routine(Weekday::Mon, "Lower", &[1, 3]), routine(Weekday::Tue, "Upper", &[2])];
        let (found, swapped) = resolve_routine(date(MONDAY), &routines, &DayOverrides::default()).unwrap();
        assert_eq!(found.name, "Lower");
        assert!(!swapped);
    }

    #[test]
    fn test_swap_overrides_weekday() {
        let routines = vec![routine(Weekday::Mon, "Lower", &[1]), routine(Weekday::Tue, "Upper", &[2])];
        let mut overrides = DayOverrides::default();
        overrides.swap(date(MONDAY), routines[1].id);

        let (found, swapped) = resolve_routine(date(MONDAY), &routines, &overrides).unwrap();
        assert_eq!(found.name, "Upper");
        assert!(swapped);

        overrides.swap(date(MONDAY), Uuid::new_v4());
        let (found, swapped) = resolve_routine(date(MONDAY), &routines, &overrides).unwrap();
        assert_eq!(found.name, "Lower");
        assert!(!swapped);
    }

    #[test]
    fn test_plan_joins_history_and_status() {
        let routines = vec![routine(Weekday::Mon, "Lower", &[1, 3, 99])];
        let exercises = catalog::default_exercises();
        let logs = vec![
            WorkoutLog::completed(date("2024-02-26"), ExerciseId::from(1), vec![SetEntry::new(225.0, 5)]),
            WorkoutLog::completed(date("2024-02-19"), ExerciseId::from(1), vec![SetEntry::new(235.0, 3)]),
            WorkoutLog::skipped(date(MONDAY), ExerciseId::from(3)),
        ];
        let cardio = vec![CardioLog {
            id: Uuid::new_v4(),
            date: date(MONDAY),
            kind: CardioKind::Run,
            duration_minutes: 15,
            distance: Some(1.5),
        }];

        let plan = plan_day(
            date(MONDAY),
            DayInputs {
                routines: &routines,
                exercises,
                logs: &logs,
                cardio: &cardio,
            },
            &DayOverrides::default(),
        );

        // Unknown exercise 99 is dropped
        assert_eq!(plan.exercises.len(), 2);

        let squat = &plan.exercises[0];
        assert_eq!(squat.status, ExerciseStatus::Pending);
        assert_eq!(squat.last.unwrap().weight, 225.0);
        assert_eq!(squat.personal_record, 235.0);
        assert_eq!(squat.sets.len(), 3);
        assert!(squat.sets.iter().all(|s| s.weight == Some(225.0) && s.reps == 5));

        let deadlift = &plan.exercises[1];
        assert_eq!(deadlift.status, ExerciseStatus::Skipped);
        assert!(deadlift.log_id.is_some());
        assert!(deadlift.sets.iter().all(|s| s.weight.is_none()));

        assert_eq!(plan.progress(), (0, 1, 2));
        assert!(!plan.cardio[0].done);
        assert_eq!(plan.unplanned_cardio.len(), 1);
    }

    #[test]
    fn test_no_routine_and_rest_flags() {
        let mut overrides = DayOverrides::default();
        overrides.toggle_rest(date(MONDAY));

        let plan = plan_day(
            date(MONDAY),
            DayInputs {
                routines: &[],
                exercises: catalog::default_exercises(),
                logs: &[],
                cardio: &[],
            },
            &overrides,
        );
        assert!(!plan.has_routine());
        assert!(plan.is_ad_hoc_rest);
        assert!(!plan.is_scheduled_rest());

        let rest = Routine {
            id: Uuid::new_v4(),
            day: Weekday::Mon,
            name: "Rest".into(),
            exercises: vec![],
            cardio: vec![],
        };
        let plan = plan_day(
            date(MONDAY),
            DayInputs {
                routines: std::slice::from_ref(&rest),
                exercises: catalog::default_exercises(),
                logs: &[],
                cardio: &[],
            },
            &DayOverrides::default(),
        );
        assert!(plan.is_scheduled_rest());
    }
}
