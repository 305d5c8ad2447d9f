//! Trend series for charts and summaries.

use crate::records::max_weight;
use crate::{BodyPart, BodyWeight, ExerciseId, Measurement, WorkoutLog};
use chrono::{Days, NaiveDate};

/// One point of a dated series
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Inclusive date window; an unset bound is open
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// The `days` days ending on (and including) `today`
    pub fn last_days(today: NaiveDate, days: u64) -> Self {
        let from = today.checked_sub_days(Days::new(days.saturating_sub(1)));
        Self {
            from: from.or(Some(NaiveDate::MIN)),
            to: Some(today),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }

    pub fn filter(&self, points: Vec<TrendPoint>) -> Vec<TrendPoint> {
        points.into_iter().filter(|p| self.contains(p.date)).collect()
    }
}

/// Summary of a series
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrendSummary {
    pub first: TrendPoint,
    pub last: TrendPoint,
    pub best: TrendPoint,
}

impl TrendSummary {
    /// Change from the first point to the last
    pub fn change(&self) -> f64 {
        self.last.value - self.first.value
    }
}

/// First, last and highest point; `None` for an empty series
pub fn summarize(points: &[TrendPoint]) -> Option<TrendSummary> {
    let first = *points.first()?;
    let last = *points.last()?;
    let best = points
        .iter()
        .copied()
        .fold(first, |best, p| if p.value > best.value { p } else { best });
    Some(TrendSummary { first, last, best })
}

/// Heaviest set of each completed session of an exercise, oldest first
pub fn exercise_trend(logs: &[WorkoutLog], exercise_id: &ExerciseId) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = logs
        .iter()
        .filter(|log| &log.exercise_id == exercise_id && !log.is_skipped())
        .map(|log| TrendPoint {
            date: log.date,
            value: max_weight(log.sets()),
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

/// Body weight entries, oldest first
pub fn body_weight_trend(entries: &[BodyWeight]) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = entries
        .iter()
        .map(|e| TrendPoint {
            date: e.date,
            value: e.weight,
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

/// Measurements of one body part, oldest first
pub fn measurement_trend(measurements: &[Measurement], part: BodyPart) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = measurements
        .iter()
        .filter(|m| m.body_part == part)
        .map(|m| TrendPoint {
            date: m.date,
            value: m.value,
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}
