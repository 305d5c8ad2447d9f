use chrono::{Datelike, NaiveDate, Weekday};
use clap::{Parser, Subcommand};
use onyx_core::catalog::{find_exercise, new_exercise, resolve_exercise};
use onyx_core::history::{logs_for_exercise, suggested_weight};
use onyx_core::logbook::{delete_log, log_cardio, record_body_weight, record_measurement};
use onyx_core::plates::{find_bar_preset, load_hint, LoadHint};
use onyx_core::records::personal_records;
use onyx_core::schedule::PlannedExercise;
use onyx_core::trends::{self, DateRange, TrendPoint};
use onyx_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "onyx")]
#[command(about = "Strength training log with plate math and PR tracking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Date to act on (YYYY-MM-DD, defaults to today)
    #[arg(long, global = true)]
    date: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the plan for the day (default)
    Today,

    /// Plates to load per side for a target weight
    Plates {
        /// Total target weight including the bar
        target: f64,

        /// Bar weight or preset name (standard, womens, ez, none)
        #[arg(long)]
        bar: Option<String>,

        /// Unit system (lbs, kg); defaults to the configured unit
        #[arg(long)]
        unit: Option<WeightUnit>,
    },

    /// List exercises
    Exercises,

    /// Add a custom exercise
    ExerciseAdd {
        name: String,

        #[arg(long, default_value = "Other")]
        category: String,
    },

    /// Log sets for an exercise, e.g. `onyx log squat 225x5 225x5 235x3`
    Log {
        /// Exercise name or id
        exercise: String,

        /// Sets as WEIGHTxREPS; `_xREPS` leaves a set blank
        #[arg(required = true)]
        sets: Vec<PlannedSet>,
    },

    /// Skip an exercise for the day, or undo a skip
    Skip { exercise: String },

    /// Delete a workout log by id
    DeleteLog { id: uuid::Uuid },

    /// Last performance before the date
    Last { exercise: String },

    /// Personal records
    Pr {
        /// Limit to one exercise
        exercise: Option<String>,
    },

    /// Set the routine for a weekday
    RoutineSet {
        /// Weekday (mon, tue, ...)
        day: Weekday,

        name: String,

        /// Exercise as NAME or NAME:SETSxREPS (repeatable)
        #[arg(long = "exercise", short = 'e')]
        exercises: Vec<String>,

        /// Cardio as TYPE:MINUTES or TYPE:MINUTES:DISTANCE (repeatable)
        #[arg(long = "cardio", short = 'c')]
        cardio: Vec<String>,
    },

    /// List the weekly routines
    Routines,

    /// Toggle an unplanned rest day
    Rest,

    /// Do another routine on the date
    Swap {
        /// Routine name or weekday
        routine: String,
    },

    /// Go back to the weekday routine
    Unswap,

    /// Log a cardio session
    Cardio {
        /// Run, Walk, Cycle, Treadmill, Stairmaster, Rowing, Elliptical, HIIT, Other
        kind: CardioKind,

        minutes: u32,

        #[arg(long)]
        distance: Option<f64>,
    },

    /// Record body weight
    Weight { weight: f64 },

    /// Record a body measurement
    Measure { part: BodyPart, value: f64 },

    /// Progress over time for an exercise, body weight or a body part
    Trend {
        /// Exercise name, "weight", or a body part
        subject: String,

        /// Only the last N days
        #[arg(long)]
        days: Option<u64>,
    },

    /// Logged sessions of an exercise, newest first
    History {
        exercise: String,

        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Show the active settings
    Settings,
}

fn main() -> Result<()> {
    // Initialize logging
    onyx_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    let date = cli.date.unwrap_or_else(|| chrono::Local::now().date_naive());
    tracing::debug!("Using data dir {:?} for {}", data_dir, date);

    let mut store = RetryingStore::new(FileStore::new(&data_dir), config.retry.delay());
    let overrides_path = data_dir.join("overrides.json");

    match cli.command.unwrap_or(Commands::Today) {
        Commands::Today => cmd_today(&store, &overrides_path, date, &config),
        Commands::Plates { target, bar, unit } => cmd_plates(target, bar, unit, &config),
        Commands::Exercises => cmd_exercises(&store),
        Commands::ExerciseAdd { name, category } => cmd_exercise_add(&mut store, &name, &category),
        Commands::Log { exercise, sets } => cmd_log(&mut store, date, &exercise, sets, &config),
        Commands::Skip { exercise } => cmd_skip(&mut store, date, &exercise),
        Commands::DeleteLog { id } => {
            delete_log(&mut store, id)?;
            println!("✓ Deleted log {}", id);
            Ok(())
        }
        Commands::Last { exercise } => cmd_last(&store, date, &exercise, &config),
        Commands::Pr { exercise } => cmd_pr(&store, exercise.as_deref(), &config),
        Commands::RoutineSet {
            day,
            name,
            exercises,
            cardio,
        } => cmd_routine_set(&mut store, day, name, &exercises, &cardio),
        Commands::Routines => cmd_routines(&store),
        Commands::Rest => {
            let resting = DayOverrides::update(&overrides_path, |o| o.toggle_rest(date))?;
            if resting {
                println!("✓ {} marked as a rest day", date);
            } else {
                println!("✓ {} is a training day again", date);
            }
            Ok(())
        }
        Commands::Swap { routine } => cmd_swap(&store, &overrides_path, date, &routine),
        Commands::Unswap => {
            if DayOverrides::update(&overrides_path, |o| o.revert_swap(date))? {
                println!("✓ {} is back on its weekday routine", date);
            } else {
                println!("No swap set for {}", date);
            }
            Ok(())
        }
        Commands::Cardio {
            kind,
            minutes,
            distance,
        } => {
            let log = log_cardio(&mut store, date, kind, minutes, distance)?;
            print!("✓ Logged {} {} min", log.kind.label(), log.duration_minutes);
            match log.distance {
                Some(d) => println!(", {} {}", format_weight(d), config.units.distance),
                None => println!(),
            }
            Ok(())
        }
        Commands::Weight { weight } => {
            let entry = record_body_weight(&mut store, date, weight)?;
            println!(
                "✓ Body weight {} {} on {}",
                format_weight(entry.weight),
                config.units.weight,
                entry.date
            );
            Ok(())
        }
        Commands::Measure { part, value } => {
            let m = record_measurement(&mut store, date, part, value)?;
            println!(
                "✓ {} {} {} on {}",
                m.body_part.label(),
                format_weight(m.value),
                config.units.measure,
                m.date
            );
            Ok(())
        }
        Commands::Trend { subject, days } => cmd_trend(&store, date, &subject, days),
        Commands::History { exercise, limit } => cmd_history(&store, &exercise, limit),
        Commands::Settings => cmd_settings(&data_dir, &config),
    }
}

fn cmd_today<S: Store>(store: &S, overrides_path: &Path, date: NaiveDate, config: &Config) -> Result<()> {
    let overrides = DayOverrides::load(overrides_path)?;
    let routines = store.list_routines()?;
    let exercises = store.list_exercises()?;
    let logs = store.list_logs(None)?;
    let cardio = store.list_cardio()?;

    let plan = plan_day(
        date,
        DayInputs {
            routines: &routines,
            exercises: &exercises,
            logs: &logs,
            cardio: &cardio,
        },
        &overrides,
    );

    println!("\n{} {}", date.weekday(), date);

    if plan.is_ad_hoc_rest {
        println!("  Rest day (unplanned). Run `onyx rest` again to undo.");
        return Ok(());
    }

    let Some(routine) = &plan.routine else {
        println!("  No routine scheduled. Set one with `onyx routine-set`.");
        return Ok(());
    };

    if plan.is_scheduled_rest() {
        println!("  Rest day ({})", routine.name);
        return Ok(());
    }

    let swapped = if plan.is_swapped { " (swapped)" } else { "" };
    let (completed, skipped, total) = plan.progress();
    println!("  {}{}  [{} done, {} skipped of {}]", routine.name, swapped, completed, skipped, total);
    println!();

    for entry in &plan.exercises {
        print_planned_exercise(entry, config);
    }

    if !plan.cardio.is_empty() || !plan.unplanned_cardio.is_empty() {
        println!("  Cardio:");
        for item in &plan.cardio {
            let mark = if item.done { "x" } else { " " };
            println!(
                "    [{}] {} {} min",
                mark,
                item.plan.kind.label(),
                item.plan.duration_minutes
            );
        }
        for log in &plan.unplanned_cardio {
            println!("    [+] {} {} min", log.kind.label(), log.duration_minutes);
        }
    }

    if config.display.show_body_weight {
        if let Some(entry) = store.list_body_weights()?.iter().find(|b| b.date == date) {
            println!("\n  Body weight: {} {}", format_weight(entry.weight), config.units.weight);
        }
    }

    println!();
    Ok(())
}

fn print_planned_exercise(entry: &PlannedExercise, config: &Config) {
    let mark = match entry.status {
        ExerciseStatus::Completed => "x",
        ExerciseStatus::Skipped => "-",
        ExerciseStatus::Pending => " ",
    };
    println!(
        "  [{}] {}  {}x{}",
        mark, entry.exercise.name, entry.target_sets, entry.target_reps
    );

    if entry.status == ExerciseStatus::Skipped {
        println!("      skipped");
        return;
    }

    if let Some(last) = entry.last {
        println!(
            "      last {}x{} ({})",
            format_weight(last.weight),
            last.reps,
            last.date
        );
    }
    if entry.personal_record > 0.0 {
        println!(
            "      PR {} {}",
            format_weight(entry.personal_record),
            config.units.weight
        );
    }

    let sets: Vec<String> = entry.sets.iter().map(ToString::to_string).collect();
    println!("      sets {}", sets.join(" "));
}

fn cmd_plates(target: f64, bar: Option<String>, unit: Option<WeightUnit>, config: &Config) -> Result<()> {
    // An explicit unit switches to that unit's standard plates and bar
    let (unit, denominations, default_bar) = match unit {
        Some(unit) if unit != config.units.weight => (
            unit,
            onyx_core::plates::default_denominations(unit).to_vec(),
            onyx_core::plates::default_bar_weight(unit),
        ),
        _ => (config.units.weight, config.plate_denominations(), config.bar_weight()),
    };

    let base = match bar {
        None => default_bar,
        Some(bar) => match bar.trim().parse::<f64>() {
            Ok(weight) if weight.is_finite() && weight >= 0.0 => weight,
            _ => find_bar_preset(unit, &bar)
                .map(|preset| preset.weight)
                .ok_or_else(|| Error::Validation(format!("unknown bar '{}'", bar)))?,
        },
    };

    let result = solve_plates(Some(target), base, &denominations);
    if result.exceeds_sleeve() {
        return Err(Error::Validation(format!(
            "{} {} needs more than {} plates per side",
            format_weight(target),
            unit,
            onyx_core::plates::MAX_PLATES_PER_SIDE
        )));
    }

    println!(
        "Target {} {} on a {} {} bar",
        format_weight(target),
        unit,
        format_weight(base),
        unit
    );

    match load_hint(Some(target), base, &result) {
        LoadHint::JustTheBar => println!("  Just the bar"),
        LoadHint::AddWeight => println!("  Nothing to load per side"),
        LoadHint::Plates => {
            let groups: Vec<String> = result
                .grouped()
                .iter()
                .map(|(plate, count)| format!("{} x {}", count, format_weight(*plate)))
                .collect();
            println!("  Per side: {}", groups.join(", "));
        }
    }

    let loaded = result.total(base);
    if result.remainder_per_side > 0.0 {
        println!(
            "  Loaded {} {} ({} {} per side not covered by plates)",
            format_weight(loaded),
            unit,
            format_weight(result.remainder_per_side),
            unit
        );
    }

    Ok(())
}

fn cmd_exercises<S: Store>(store: &S) -> Result<()> {
    let mut exercises = store.list_exercises()?;
    exercises.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));

    for exercise in &exercises {
        println!("{:<10} {:<20} {}", exercise.category, exercise.name, exercise.id);
    }
    Ok(())
}

fn cmd_exercise_add<S: Store>(store: &mut S, name: &str, category: &str) -> Result<()> {
    let exercise = new_exercise(&store.list_exercises()?, name, category)?;
    store.add_exercise(&exercise)?;
    println!("✓ Added {} ({})", exercise.name, exercise.category);
    Ok(())
}

fn cmd_log<S: Store>(
    store: &mut S,
    date: NaiveDate,
    query: &str,
    sets: Vec<PlannedSet>,
    config: &Config,
) -> Result<()> {
    let exercise = resolve_exercise(&store.list_exercises()?, query)?.clone();
    let logged = log_exercise(store, date, &exercise.id, sets)?;

    let sets: Vec<String> = logged
        .log
        .sets()
        .iter()
        .map(|s| format!("{}x{}", format_weight(s.weight), s.reps))
        .collect();
    println!("✓ Logged {} on {}: {}", exercise.name, date, sets.join(" "));

    if logged.new_record && config.display.show_confetti {
        println!(
            "🎉 New personal record! (previous {} {})",
            format_weight(logged.previous_record),
            config.units.weight
        );
    }
    Ok(())
}

fn cmd_skip<S: Store>(store: &mut S, date: NaiveDate, query: &str) -> Result<()> {
    let exercise = resolve_exercise(&store.list_exercises()?, query)?.clone();
    match toggle_skip(store, date, &exercise.id)? {
        SkipOutcome::Skipped => println!("✓ Skipped {} on {}", exercise.name, date),
        SkipOutcome::Unskipped => println!("✓ {} is pending again on {}", exercise.name, date),
    }
    Ok(())
}

fn cmd_last<S: Store>(store: &S, date: NaiveDate, query: &str, config: &Config) -> Result<()> {
    let exercise = resolve_exercise(&store.list_exercises()?, query)?.clone();
    let logs = store.list_logs(Some(&exercise.id))?;

    match project_last_performance(&logs, &exercise.id, date) {
        Some(last) => {
            println!(
                "{}: {}x{} on {}",
                exercise.name,
                format_weight(last.weight),
                last.reps,
                last.date
            );
            if let Some(weight) = suggested_weight(&logs, &exercise.id, date) {
                println!("  Suggested: {} {}", format_weight(weight), config.units.weight);
            }
        }
        None => println!("{}: no previous performance", exercise.name),
    }
    Ok(())
}

fn cmd_pr<S: Store>(store: &S, query: Option<&str>, config: &Config) -> Result<()> {
    let exercises = store.list_exercises()?;

    if let Some(query) = query {
        let exercise = resolve_exercise(&exercises, query)?;
        let logs = store.list_logs(Some(&exercise.id))?;
        let record = compute_personal_record(&logs, &exercise.id);
        if record > 0.0 {
            println!("{}: {} {}", exercise.name, format_weight(record), config.units.weight);
        } else {
            println!("{}: no record yet", exercise.name);
        }
        return Ok(());
    }

    let records = personal_records(&store.list_logs(None)?);
    let mut found = false;
    for exercise in &exercises {
        if let Some(record) = records.get(&exercise.id).filter(|r| **r > 0.0) {
            println!("{:<20} {} {}", exercise.name, format_weight(*record), config.units.weight);
            found = true;
        }
    }
    if !found {
        println!("No records yet");
    }
    Ok(())
}

/// Parse NAME or NAME:SETSxREPS against the exercise list
fn parse_routine_exercise(exercises: &[Exercise], input: &str) -> Result<RoutineExercise> {
    let (name, targets) = match input.rsplit_once(':') {
        Some((name, targets)) => (name, Some(targets)),
        None => (input, None),
    };
    let exercise = resolve_exercise(exercises, name)?;
    let mut slot = RoutineExercise::new(exercise.id.clone());

    if let Some(targets) = targets {
        let (sets, reps) = targets
            .to_lowercase()
            .split_once('x')
            .and_then(|(s, r)| Some((s.trim().parse().ok()?, r.trim().parse().ok()?)))
            .ok_or_else(|| Error::Validation(format!("expected SETSxREPS in '{}'", input)))?;
        slot.sets = sets;
        slot.reps = reps;
    }
    Ok(slot)
}

/// Parse TYPE:MINUTES or TYPE:MINUTES:DISTANCE
fn parse_planned_cardio(input: &str) -> Result<PlannedCardio> {
    let invalid = || Error::Validation(format!("expected TYPE:MINUTES[:DISTANCE], got '{}'", input));
    let mut parts = input.split(':');

    let kind: CardioKind = parts.next().ok_or_else(invalid)?.parse()?;
    let duration_minutes = parts
        .next()
        .and_then(|m| m.trim().parse().ok())
        .ok_or_else(invalid)?;
    let distance = match parts.next() {
        Some(d) => Some(d.trim().parse::<f64>().map_err(|_| invalid())?),
        None => None,
    };

    Ok(PlannedCardio {
        kind,
        duration_minutes,
        distance,
    })
}

fn cmd_routine_set<S: Store>(
    store: &mut S,
    day: Weekday,
    name: String,
    exercise_args: &[String],
    cardio_args: &[String],
) -> Result<()> {
    let exercises = store.list_exercises()?;
    let slots = exercise_args
        .iter()
        .map(|input| parse_routine_exercise(&exercises, input))
        .collect::<Result<Vec<_>>>()?;
    let cardio = cardio_args
        .iter()
        .map(|input| parse_planned_cardio(input))
        .collect::<Result<Vec<_>>>()?;

    // Keep the id when replacing the weekday's routine so swaps still resolve
    let id = store
        .list_routines()?
        .iter()
        .find(|r| r.day == day)
        .map(|r| r.id)
        .unwrap_or_else(uuid::Uuid::new_v4);

    let routine = Routine {
        id,
        day,
        name,
        exercises: slots,
        cardio,
    };
    store.save_routine(&routine)?;

    if routine.is_rest() {
        println!("✓ {} is a rest day", day);
    } else {
        println!(
            "✓ {} set for {} ({} exercises, {} cardio)",
            routine.name,
            day,
            routine.exercises.len(),
            routine.cardio.len()
        );
    }
    Ok(())
}

fn cmd_routines<S: Store>(store: &S) -> Result<()> {
    let exercises = store.list_exercises()?;
    let mut routines = store.list_routines()?;
    routines.sort_by_key(|r| r.day.num_days_from_monday());

    if routines.is_empty() {
        println!("No routines yet");
        return Ok(());
    }

    for routine in &routines {
        if routine.is_rest() {
            println!("{}  {} (rest)", routine.day, routine.name);
            continue;
        }
        println!("{}  {}", routine.day, routine.name);
        for slot in &routine.exercises {
            let name = find_exercise(&exercises, slot.exercise_id.as_str())
                .map(|e| e.name.as_str())
                .unwrap_or("(unknown exercise)");
            println!("     {} {}x{}", name, slot.sets, slot.reps);
        }
        for cardio in &routine.cardio {
            println!("     {} {} min", cardio.kind.label(), cardio.duration_minutes);
        }
    }
    Ok(())
}

fn cmd_swap<S: Store>(store: &S, overrides_path: &Path, date: NaiveDate, query: &str) -> Result<()> {
    let routines = store.list_routines()?;
    let routine = routines
        .iter()
        .find(|r| r.name.eq_ignore_ascii_case(query.trim()))
        .or_else(|| {
            let day: Weekday = query.trim().parse().ok()?;
            routines.iter().find(|r| r.day == day)
        })
        .ok_or_else(|| Error::NotFound(format!("routine '{}'", query.trim())))?;

    // Swapping to the weekday's own routine just clears the swap
    if routines
        .iter()
        .any(|r| r.day == date.weekday() && r.id == routine.id)
    {
        DayOverrides::update(overrides_path, |o| o.revert_swap(date))?;
        println!("✓ {} runs {}", date, routine.name);
        return Ok(());
    }

    DayOverrides::update(overrides_path, |o| o.swap(date, routine.id))?;
    println!("✓ {} swapped to {}", date, routine.name);
    Ok(())
}

fn print_series(points: &[TrendPoint]) {
    for point in points {
        println!("  {}  {}", point.date, format_weight(point.value));
    }
    if let Some(summary) = trends::summarize(points) {
        let change = summary.change();
        let sign = if change > 0.0 { "+" } else if change < 0.0 { "-" } else { "" };
        println!(
            "  change {}{}, best {} on {}",
            sign,
            format_weight(change.abs()),
            format_weight(summary.best.value),
            summary.best.date
        );
    }
}

fn cmd_trend<S: Store>(store: &S, today: NaiveDate, subject: &str, days: Option<u64>) -> Result<()> {
    let range = days.map_or_else(DateRange::default, |d| DateRange::last_days(today, d));
    let subject = subject.trim();

    let (title, points) = if ["weight", "bodyweight", "body-weight"]
        .iter()
        .any(|s| s.eq_ignore_ascii_case(subject))
    {
        ("Body weight".to_string(), trends::body_weight_trend(&store.list_body_weights()?))
    } else if let Ok(part) = subject.parse::<BodyPart>() {
        (
            part.label().to_string(),
            trends::measurement_trend(&store.list_measurements()?, part),
        )
    } else {
        let exercise = resolve_exercise(&store.list_exercises()?, subject)?.clone();
        let logs = store.list_logs(Some(&exercise.id))?;
        (exercise.name, trends::exercise_trend(&logs, &exercise.id))
    };

    let points = range.filter(points);
    println!("{}", title);
    if points.is_empty() {
        println!("  No data");
    } else {
        print_series(&points);
    }
    Ok(())
}

fn cmd_history<S: Store>(store: &S, query: &str, limit: usize) -> Result<()> {
    let exercise = resolve_exercise(&store.list_exercises()?, query)?.clone();
    let logs = store.list_logs(Some(&exercise.id))?;

    println!("{}", exercise.name);
    let recent = logs_for_exercise(&logs, &exercise.id);
    if recent.is_empty() {
        println!("  No sessions logged");
    }
    for log in recent.into_iter().take(limit) {
        if log.is_skipped() {
            println!("  {}  skipped  {}", log.date, log.id);
            continue;
        }
        let sets: Vec<String> = log
            .sets()
            .iter()
            .map(|s| format!("{}x{}", format_weight(s.weight), s.reps))
            .collect();
        println!("  {}  {}  {}", log.date, sets.join(" "), log.id);
    }
    Ok(())
}

fn cmd_settings(data_dir: &Path, config: &Config) -> Result<()> {
    let plates: Vec<String> = config
        .plate_denominations()
        .iter()
        .map(|p| format_weight(*p))
        .collect();
    let increments: Vec<String> = config
        .timer
        .increments
        .iter()
        .map(|s| format!("{}s", s))
        .collect();

    println!("Data directory:   {}", data_dir.display());
    println!("Config file:      {}", Config::default_config_path().display());
    println!(
        "Units:            {} / {} / {}",
        config.units.weight, config.units.measure, config.units.distance
    );
    println!("Bar weight:       {}", format_weight(config.bar_weight()));
    println!("Plates:           {}", plates.join(", "));
    println!("Timer increments: {}", increments.join(", "));
    println!("Confetti:         {}", on_off(config.display.show_confetti));
    println!("Body weight:      {}", on_off(config.display.show_body_weight));
    println!("Measurements:     {}", on_off(config.display.show_measurements));
    println!("Retry delay:      {} ms", config.retry.delay_ms);
    Ok(())
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
