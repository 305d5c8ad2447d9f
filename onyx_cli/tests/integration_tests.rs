//! Integration tests for the onyx binary.
//!
//! These tests verify end-to-end behavior including:
//! - Plate math
//! - Logging, last performance and PR celebration
//! - Day planning with routines, skips, rest days and swaps
//! - Body tracking and trends

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a test directory holding the data dir and config
fn setup_test_dir() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("config.toml"), "").expect("Failed to write config");
    temp_dir
}

fn data_dir(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("data")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("onyx"))
}

/// CLI pointed at the test's data dir and config
fn onyx(temp_dir: &TempDir) -> Command {
    let mut cmd = cli();
    cmd.arg("--data-dir")
        .arg(data_dir(temp_dir))
        .arg("--config")
        .arg(temp_dir.path().join("config.toml"));
    cmd
}

fn log_sets(temp_dir: &TempDir, date: &str, exercise: &str, sets: &[&str]) {
    onyx(temp_dir)
        .args(["--date", date, "log", exercise])
        .args(sets)
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Strength training log with plate math and PR tracking",
        ));
}

#[test]
fn test_plates_standard_bar() {
    let temp_dir = setup_test_dir();

    onyx(&temp_dir)
        .args(["plates", "225"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Per side: 2 x 45"));
}

#[test]
fn test_plates_just_the_bar() {
    let temp_dir = setup_test_dir();

    onyx(&temp_dir)
        .args(["plates", "45"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Just the bar"));
}

#[test]
fn test_plates_bar_preset_and_kg() {
    let temp_dir = setup_test_dir();

    onyx(&temp_dir)
        .args(["plates", "135", "--bar", "ez"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Per side: 1 x 45, 1 x 10"));

    onyx(&temp_dir)
        .args(["plates", "100", "--unit", "kg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Per side: 1 x 25, 1 x 15"));
}

#[test]
fn test_plates_remainder_reported() {
    let temp_dir = setup_test_dir();

    onyx(&temp_dir)
        .args(["plates", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Per side: 1 x 2.5"));

    onyx(&temp_dir)
        .args(["plates", "48"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.5 lbs per side not covered"));
}

#[test]
fn test_unknown_bar_rejected() {
    let temp_dir = setup_test_dir();

    onyx(&temp_dir)
        .args(["plates", "135", "--bar", "trap"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown bar"));
}

#[test]
fn test_plates_absurd_target_rejected() {
    let temp_dir = setup_test_dir();

    onyx(&temp_dir)
        .args(["plates", "1e20"])
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .failure()
        .stderr(predicate::str::contains("plates per side"));
}

#[test]
fn test_plates_tiny_remainder_formatting() {
    let temp_dir = setup_test_dir();

    onyx(&temp_dir)
        .args(["plates", "135.001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Per side: 1 x 45"))
        .stdout(predicate::str::contains("(0 lbs per side"))
        .stdout(predicate::str::contains("0. lbs").not());
}

#[test]
fn test_default_exercises_listed() {
    let temp_dir = setup_test_dir();

    onyx(&temp_dir)
        .arg("exercises")
        .assert()
        .success()
        .stdout(predicate::str::contains("Squat"))
        .stdout(predicate::str::contains("Overhead Press"));

    // Listing never writes
    assert!(!data_dir(&temp_dir).exists());
}

#[test]
fn test_exercise_add_and_duplicate() {
    let temp_dir = setup_test_dir();

    onyx(&temp_dir)
        .args(["exercise-add", "Barbell Row", "--category", "Back"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Barbell Row"));

    onyx(&temp_dir)
        .args(["exercise-add", "barbell row"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    onyx(&temp_dir)
        .arg("exercises")
        .assert()
        .success()
        .stdout(predicate::str::contains("Barbell Row"))
        .stdout(predicate::str::contains("Squat"));
}

#[test]
fn test_log_then_last_performance() {
    let temp_dir = setup_test_dir();

    log_sets(&temp_dir, "2024-03-01", "squat", &["215x5", "225x5", "225x4"]);

    onyx(&temp_dir)
        .args(["--date", "2024-03-04", "last", "squat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Squat: 225x5 on 2024-03-01"))
        .stdout(predicate::str::contains("Suggested: 225 lbs"));

    // Nothing before the first session
    onyx(&temp_dir)
        .args(["--date", "2024-03-01", "last", "squat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no previous performance"));
}

#[test]
fn test_new_record_celebrated() {
    let temp_dir = setup_test_dir();

    onyx(&temp_dir)
        .args(["--date", "2024-03-01", "log", "bench press", "185x5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New personal record").not());

    onyx(&temp_dir)
        .args(["--date", "2024-03-04", "log", "bench press", "190x3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New personal record! (previous 185 lbs)"));

    onyx(&temp_dir)
        .args(["pr", "bench press"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bench Press: 190 lbs"));
}

#[test]
fn test_confetti_can_be_disabled() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("config.toml"),
        "[display]\nshow_confetti = false\n",
    )
    .unwrap();

    log_sets(&temp_dir, "2024-03-01", "deadlift", &["315x5"]);

    onyx(&temp_dir)
        .args(["--date", "2024-03-04", "log", "deadlift", "335x3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New personal record").not());
}

#[test]
fn test_blank_sets_rejected() {
    let temp_dir = setup_test_dir();

    onyx(&temp_dir)
        .args(["log", "squat", "_x5", "_x5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no sets with a weight"));

    assert!(!data_dir(&temp_dir).join("workout_logs.json").exists());
}

#[test]
fn test_unknown_exercise_rejected() {
    let temp_dir = setup_test_dir();

    onyx(&temp_dir)
        .args(["log", "zercher squat", "135x5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NotFound"));
}

#[test]
fn test_relogging_same_day_keeps_one_log() {
    let temp_dir = setup_test_dir();

    log_sets(&temp_dir, "2024-03-04", "squat", &["225x5"]);
    log_sets(&temp_dir, "2024-03-04", "squat", &["225x5", "230x5"]);

    let contents = fs::read_to_string(data_dir(&temp_dir).join("workout_logs.json")).unwrap();
    let logs: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(logs.as_array().unwrap().len(), 1);
    assert_eq!(logs[0]["sets"].as_array().unwrap().len(), 2);
}

#[test]
fn test_today_without_routine() {
    let temp_dir = setup_test_dir();

    onyx(&temp_dir)
        .args(["--date", "2024-03-04"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No routine scheduled"));
}

/// Monday "Lower" routine with a week of squat history
fn setup_lower_day(temp_dir: &TempDir) {
    onyx(temp_dir)
        .args([
            "routine-set", "mon", "Lower", "-e", "squat:3x5", "-e", "deadlift", "-c", "walk:20",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lower set for Mon"));

    log_sets(temp_dir, "2024-02-26", "squat", &["225x5", "225x5"]);
}

#[test]
fn test_today_shows_plan() {
    let temp_dir = setup_test_dir();
    setup_lower_day(&temp_dir);

    onyx(&temp_dir)
        .args(["--date", "2024-03-04", "today"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lower"))
        .stdout(predicate::str::contains("[ ] Squat  3x5"))
        .stdout(predicate::str::contains("last 225x5 (2024-02-26)"))
        .stdout(predicate::str::contains("sets 225x5 225x5 225x5"))
        .stdout(predicate::str::contains("[ ] Deadlift  3x10"))
        .stdout(predicate::str::contains("sets _x10 _x10 _x10"))
        .stdout(predicate::str::contains("[ ] Walk 20 min"));
}

#[test]
fn test_completed_exercise_and_cardio_marked() {
    let temp_dir = setup_test_dir();
    setup_lower_day(&temp_dir);

    log_sets(&temp_dir, "2024-03-04", "squat", &["230x5"]);
    onyx(&temp_dir)
        .args(["--date", "2024-03-04", "cardio", "walk", "25", "--distance", "1.2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged Walk 25 min, 1.2 mi"));

    onyx(&temp_dir)
        .args(["--date", "2024-03-04"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] Squat"))
        .stdout(predicate::str::contains("sets 230x5"))
        .stdout(predicate::str::contains("[x] Walk 20 min"))
        .stdout(predicate::str::contains("[1 done, 0 skipped of 2]"));
}

#[test]
fn test_skip_toggles() {
    let temp_dir = setup_test_dir();
    setup_lower_day(&temp_dir);

    onyx(&temp_dir)
        .args(["--date", "2024-03-04", "skip", "deadlift"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped Deadlift"));

    onyx(&temp_dir)
        .args(["--date", "2024-03-04"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[-] Deadlift"));

    onyx(&temp_dir)
        .args(["--date", "2024-03-04", "skip", "deadlift"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pending again"));

    onyx(&temp_dir)
        .args(["--date", "2024-03-04"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[ ] Deadlift"));
}

#[test]
fn test_rest_day_toggle() {
    let temp_dir = setup_test_dir();
    setup_lower_day(&temp_dir);

    onyx(&temp_dir)
        .args(["--date", "2024-03-04", "rest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("marked as a rest day"));
    assert!(data_dir(&temp_dir).join("overrides.json").exists());

    onyx(&temp_dir)
        .args(["--date", "2024-03-04"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rest day (unplanned)"));

    onyx(&temp_dir)
        .args(["--date", "2024-03-04", "rest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("training day again"));
}

#[test]
fn test_empty_routine_is_scheduled_rest() {
    let temp_dir = setup_test_dir();

    onyx(&temp_dir)
        .args(["routine-set", "sun", "Recovery"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sun is a rest day"));

    // 2024-03-03 is a Sunday
    onyx(&temp_dir)
        .args(["--date", "2024-03-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rest day (Recovery)"));
}

#[test]
fn test_swap_and_unswap() {
    let temp_dir = setup_test_dir();
    setup_lower_day(&temp_dir);
    onyx(&temp_dir)
        .args(["routine-set", "tue", "Upper", "-e", "bench press:5x5"])
        .assert()
        .success();

    onyx(&temp_dir)
        .args(["--date", "2024-03-04", "swap", "upper"])
        .assert()
        .success()
        .stdout(predicate::str::contains("swapped to Upper"));

    onyx(&temp_dir)
        .args(["--date", "2024-03-04"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Upper (swapped)"))
        .stdout(predicate::str::contains("Bench Press  5x5"));

    onyx(&temp_dir)
        .args(["--date", "2024-03-04", "unswap"])
        .assert()
        .success()
        .stdout(predicate::str::contains("back on its weekday routine"));

    onyx(&temp_dir)
        .args(["--date", "2024-03-04"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lower"));
}

#[test]
fn test_routines_listed_in_week_order() {
    let temp_dir = setup_test_dir();
    onyx(&temp_dir)
        .args(["routine-set", "wed", "Pull", "-e", "pull up:4x8"])
        .assert()
        .success();
    onyx(&temp_dir)
        .args(["routine-set", "mon", "Push", "-e", "bench press"])
        .assert()
        .success();

    let output = onyx(&temp_dir)
        .arg("routines")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8_lossy(&output);

    let push = stdout.find("Push").expect("Push listed");
    let pull = stdout.find("Pull").expect("Pull listed");
    assert!(push < pull);
    assert!(stdout.contains("Pull Up 4x8"));
}

#[test]
fn test_body_weight_one_per_day_and_trend() {
    let temp_dir = setup_test_dir();

    for (date, weight) in [("2024-03-01", "182"), ("2024-03-01", "181.5"), ("2024-03-08", "180")] {
        onyx(&temp_dir)
            .args(["--date", date, "weight", weight])
            .assert()
            .success();
    }

    onyx(&temp_dir)
        .args(["trend", "weight"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-03-01  181.5"))
        .stdout(predicate::str::contains("2024-03-08  180"))
        .stdout(predicate::str::contains("change -1.5"))
        .stdout(predicate::str::contains("182").not());
}

#[test]
fn test_measurement_trend() {
    let temp_dir = setup_test_dir();

    onyx(&temp_dir)
        .args(["--date", "2024-03-01", "measure", "waist", "33"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Waist 33 in"));
    onyx(&temp_dir)
        .args(["--date", "2024-03-15", "measure", "waist", "32.5"])
        .assert()
        .success();

    onyx(&temp_dir)
        .args(["--date", "2024-03-20", "trend", "waist", "--days", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-03-15  32.5"))
        .stdout(predicate::str::contains("2024-03-01").not());
}

#[test]
fn test_history_and_delete_log() {
    let temp_dir = setup_test_dir();
    log_sets(&temp_dir, "2024-03-01", "squat", &["225x5"]);
    log_sets(&temp_dir, "2024-03-04", "squat", &["230x5"]);

    let output = onyx(&temp_dir)
        .args(["history", "squat"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8_lossy(&output);
    assert!(stdout.find("2024-03-04").unwrap() < stdout.find("2024-03-01").unwrap());

    let contents = fs::read_to_string(data_dir(&temp_dir).join("workout_logs.json")).unwrap();
    let logs: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let id = logs[0]["id"].as_str().unwrap().to_string();

    onyx(&temp_dir)
        .args(["delete-log", id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted log"));

    onyx(&temp_dir)
        .args(["delete-log", id.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NotFound"));
}

#[test]
fn test_settings_shows_defaults() {
    let temp_dir = setup_test_dir();

    onyx(&temp_dir)
        .arg("settings")
        .assert()
        .success()
        .stdout(predicate::str::contains("lbs / in / mi"))
        .stdout(predicate::str::contains("Plates:           45, 35, 25, 10, 5, 2.5"))
        .stdout(predicate::str::contains("Timer increments: 30s, 60s, 90s"))
        .stdout(predicate::str::contains("Retry delay:      500 ms"));
}

#[test]
fn test_kg_config_changes_plates() {
    let temp_dir = setup_test_dir();
    fs::write(temp_dir.path().join("config.toml"), "[units]\nweight = \"kg\"\n").unwrap();

    onyx(&temp_dir)
        .args(["plates", "60"])
        .assert()
        .success()
        .stdout(predicate::str::contains("on a 20 kg bar"))
        .stdout(predicate::str::contains("Per side: 1 x 20"));
}
