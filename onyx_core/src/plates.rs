//! Barbell plate loading.
//!
//! Splits the load above the bar evenly across both sides and fills each
//! side greedily from the heaviest plate down. Greedy filling is only
//! guaranteed to use the fewest plates when the denominations form a
//! canonical system (standard gym sets do). For an arbitrary configured set
//! it still yields a valid loading, just not necessarily the minimal one.

use crate::WeightUnit;

/// Standard pound plates, heaviest first
pub const LBS_PLATES: [f64; 6] = [45.0, 35.0, 25.0, 10.0, 5.0, 2.5];

/// Standard kilogram plates, heaviest first
pub const KG_PLATES: [f64; 7] = [25.0, 20.0, 15.0, 10.0, 5.0, 2.5, 1.25];

/// Absorbs float drift from fractional plates and bar weights
const EPSILON: f64 = 1e-9;

/// Most plates a single sleeve can hold; load beyond this is left over
pub const MAX_PLATES_PER_SIDE: usize = 64;

/// Plates to load on each side of the bar
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlateResult {
    /// Plates per side, heaviest first
    pub plates: Vec<f64>,
    /// Load per side that no available plate covers (micro-plates, clips)
    pub remainder_per_side: f64,
}

impl PlateResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Weight of the plates on one side
    pub fn per_side(&self) -> f64 {
        self.plates.iter().sum()
    }

    /// Total weight on the bar including the bar itself
    pub fn total(&self, base_weight: f64) -> f64 {
        base_weight + 2.0 * self.per_side()
    }

    /// Whether the solver ran out of sleeve before covering the load
    pub fn exceeds_sleeve(&self) -> bool {
        self.plates.len() >= MAX_PLATES_PER_SIDE && self.remainder_per_side > 0.0
    }

    /// Plates grouped as (denomination, count), heaviest first
    pub fn grouped(&self) -> Vec<(f64, usize)> {
        let mut groups: Vec<(f64, usize)> = Vec::new();
        for &plate in &self.plates {
            match groups.last_mut() {
                Some((weight, count)) if (*weight - plate).abs() < EPSILON => *count += 1,
                _ => groups.push((plate, 1)),
            }
        }
        groups
    }
}

/// What to show when there is nothing (or something) to load
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadHint {
    /// At least one plate per side
    Plates,
    /// The target does not exceed the bar
    JustTheBar,
    /// No target yet, or too little above the bar for the smallest plate
    AddWeight,
}

/// Named bar options offered for each unit system
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarPreset {
    pub label: &'static str,
    pub weight: f64,
}

const LBS_BARS: [BarPreset; 4] = [
    BarPreset { label: "None/Machine", weight: 0.0 },
    BarPreset { label: "EZ Bar", weight: 25.0 },
    BarPreset { label: "Womens", weight: 35.0 },
    BarPreset { label: "Standard", weight: 45.0 },
];

const KG_BARS: [BarPreset; 4] = [
    BarPreset { label: "None/Machine", weight: 0.0 },
    BarPreset { label: "EZ Bar", weight: 10.0 },
    BarPreset { label: "Womens", weight: 15.0 },
    BarPreset { label: "Standard", weight: 20.0 },
];

pub fn bar_presets(unit: WeightUnit) -> &'static [BarPreset] {
    match unit {
        WeightUnit::Lbs => &LBS_BARS,
        WeightUnit::Kg => &KG_BARS,
    }
}

/// Look up a preset by label prefix ("ez", "standard", "none", "womens")
pub fn find_bar_preset(unit: WeightUnit, name: &str) -> Option<BarPreset> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    bar_presets(unit)
        .iter()
        .find(|p| p.label.to_lowercase().starts_with(&wanted))
        .copied()
}

pub fn default_denominations(unit: WeightUnit) -> &'static [f64] {
    match unit {
        WeightUnit::Lbs => &LBS_PLATES,
        WeightUnit::Kg => &KG_PLATES,
    }
}

pub fn default_bar_weight(unit: WeightUnit) -> f64 {
    match unit {
        WeightUnit::Lbs => 45.0,
        WeightUnit::Kg => 20.0,
    }
}

/// Compute the per-side plate loading for a target weight
///
/// Returns an empty result when the target is unset or zero, or lies below
/// the base weight. Non-positive denominations are ignored and the rest are
/// used heaviest first regardless of input order. A negative or non-finite
/// base weight counts as no bar. At most [`MAX_PLATES_PER_SIDE`] plates are
/// placed; whatever they cannot hold stays in the remainder.
pub fn solve_plates(target_weight: Option<f64>, base_weight: f64, denominations: &[f64]) -> PlateResult {
    let target = match target_weight {
        Some(t) if t.is_finite() && t > 0.0 => t,
        _ => return PlateResult::empty(),
    };
    let base = sanitize_base(base_weight);

    if target < base {
        return PlateResult::empty();
    }

    let mut available: Vec<f64> = denominations
        .iter()
        .copied()
        .filter(|d| d.is_finite() && *d > 0.0)
        .collect();
    available.sort_by(|a, b| b.total_cmp(a));

    let mut remaining = (target - base) / 2.0;
    let mut plates = Vec::new();

    for plate in available {
        let room = MAX_PLATES_PER_SIDE - plates.len();
        let fits = ((remaining + EPSILON) / plate).floor();
        let count = if fits >= room as f64 { room } else { fits as usize };
        if count == 0 {
            continue;
        }
        plates.extend(std::iter::repeat(plate).take(count));
        remaining -= count as f64 * plate;
    }

    if remaining.abs() < EPSILON {
        remaining = 0.0;
    }

    tracing::debug!(
        "Plates for {} on {} bar: {:?} per side, {} left over",
        target,
        base,
        plates,
        remaining
    );

    PlateResult {
        plates,
        remainder_per_side: remaining,
    }
}

/// Classify a solved loading for display
pub fn load_hint(target_weight: Option<f64>, base_weight: f64, result: &PlateResult) -> LoadHint {
    if !result.plates.is_empty() {
        return LoadHint::Plates;
    }
    match target_weight {
        Some(t) if t.is_finite() && t > 0.0 && t <= sanitize_base(base_weight) => LoadHint::JustTheBar,
        _ => LoadHint::AddWeight,
    }
}

fn sanitize_base(base_weight: f64) -> f64 {
    if base_weight.is_finite() && base_weight > 0.0 {
        base_weight
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_round_trip(target: f64, base: f64, plates: &[f64]) {
        let result = solve_plates(Some(target), base, plates);
        let total = result.total(base) + 2.0 * result.remainder_per_side;
        assert!(
            (total - target).abs() < 1e-6,
            "{} on {} bar reassembled to {}",
            target,
            base,
            total
        );
    }

    #[test]
    fn test_single_plate_per_side() {
        let result = solve_plates(Some(135.0), 45.0, &LBS_PLATES);
        assert_eq!(result.plates, vec![45.0]);
        assert_eq!(result.remainder_per_side, 0.0);
    }

    #[test]
    fn test_mixed_plates() {
        let result = solve_plates(Some(100.0), 45.0, &LBS_PLATES);
        assert_eq!(result.plates, vec![25.0, 2.5]);
        assert_eq!(result.remainder_per_side, 0.0);
    }

    #[test]
    fn test_repeats_heaviest_plate() {
        let result = solve_plates(Some(315.0), 45.0, &LBS_PLATES);
        assert_eq!(result.plates, vec![45.0, 45.0, 45.0]);
        assert_eq!(result.grouped(), vec![(45.0, 3)]);
    }

    #[test]
    fn test_below_bar_is_empty() {
        let result = solve_plates(Some(44.0), 45.0, &LBS_PLATES);
        assert_eq!(result, PlateResult::empty());
        assert_eq!(load_hint(Some(44.0), 45.0, &result), LoadHint::JustTheBar);
    }

    #[test]
    fn test_unset_target_is_empty() {
        let result = solve_plates(None, 45.0, &LBS_PLATES);
        assert_eq!(result, PlateResult::empty());
        assert_eq!(load_hint(None, 45.0, &result), LoadHint::AddWeight);

        let zero = solve_plates(Some(0.0), 45.0, &LBS_PLATES);
        assert_eq!(zero, PlateResult::empty());
    }

    #[test]
    fn test_target_equal_to_bar() {
        let result = solve_plates(Some(45.0), 45.0, &LBS_PLATES);
        assert!(result.plates.is_empty());
        assert_eq!(result.remainder_per_side, 0.0);
        assert_eq!(load_hint(Some(45.0), 45.0, &result), LoadHint::JustTheBar);
    }

    #[test]
    fn test_micro_load_remainder() {
        let result = solve_plates(Some(137.0), 45.0, &LBS_PLATES);
        assert_eq!(result.plates, vec![45.0]);
        assert!((result.remainder_per_side - 1.0).abs() < 1e-9);

        // Above the bar but under the smallest plate
        let result = solve_plates(Some(48.0), 45.0, &LBS_PLATES);
        assert!(result.plates.is_empty());
        assert!((result.remainder_per_side - 1.5).abs() < 1e-9);
        assert_eq!(load_hint(Some(48.0), 45.0, &result), LoadHint::AddWeight);
    }

    #[test]
    fn test_kilogram_plates() {
        let result = solve_plates(Some(102.5), 20.0, &KG_PLATES);
        // 41.25 per side
        assert_eq!(result.plates, vec![25.0, 15.0, 1.25]);
        assert_eq!(result.remainder_per_side, 0.0);
    }

    #[test]
    fn test_unsorted_and_invalid_denominations() {
        let result = solve_plates(Some(100.0), 45.0, &[2.5, 0.0, 25.0, -5.0]);
        assert_eq!(result.plates, vec![25.0, 2.5]);
    }

    #[test]
    fn test_no_bar() {
        let result = solve_plates(Some(20.0), 0.0, &LBS_PLATES);
        assert_eq!(result.plates, vec![10.0]);
        let result = solve_plates(Some(20.0), -10.0, &LBS_PLATES);
        assert_eq!(result.plates, vec![10.0]);
    }

    #[test]
    fn test_greedy_is_not_always_minimal() {
        // 40 per side: greedy takes 25+10+5 where 20+20 would do
        let result = solve_plates(Some(80.0), 0.0, &[25.0, 20.0, 10.0, 5.0]);
        assert_eq!(result.plates, vec![25.0, 10.0, 5.0]);
    }

    #[test]
    fn test_round_trip_totals() {
        for target in [45.0, 46.0, 95.0, 137.5, 225.0, 232.5, 405.0, 1000.3] {
            assert_round_trip(target, 45.0, &LBS_PLATES);
        }
        for target in [20.0, 21.0, 60.0, 102.5, 142.5, 187.75] {
            assert_round_trip(target, 20.0, &KG_PLATES);
        }
        assert_round_trip(100.0, 20.4, &KG_PLATES);
    }

    #[test]
    fn test_huge_target_is_bounded() {
        let result = solve_plates(Some(1e20), 45.0, &LBS_PLATES);
        assert_eq!(result.plates.len(), MAX_PLATES_PER_SIDE);
        assert!(result.plates.iter().all(|&p| p == 45.0));
        assert!(result.remainder_per_side > 0.0);
        assert!(result.exceeds_sleeve());

        let normal = solve_plates(Some(405.0), 45.0, &LBS_PLATES);
        assert!(!normal.exceeds_sleeve());
    }

    #[test]
    fn test_bar_presets() {
        let ez = find_bar_preset(WeightUnit::Lbs, "ez").unwrap();
        assert_eq!(ez.weight, 25.0);
        let standard = find_bar_preset(WeightUnit::Kg, "Standard").unwrap();
        assert_eq!(standard.weight, 20.0);
        assert!(find_bar_preset(WeightUnit::Kg, "trap").is_none());
        assert!(find_bar_preset(WeightUnit::Kg, "").is_none());
    }
}
