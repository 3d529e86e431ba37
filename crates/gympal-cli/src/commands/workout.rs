use clap::Args;
use gympal_core::seed::{self, DemoPlan};
use gympal_core::workout::today;
use gympal_core::NewSet;

use super::{CmdResult, Session};

#[derive(Args)]
pub struct LogArgs {
    /// Exercise name; created with tag "General" if new
    #[arg(long, short)]
    pub exercise: String,
    /// Whole number of reps
    #[arg(long, short, allow_hyphen_values = true)]
    pub reps: String,
    /// Weight lifted, 0 for bodyweight
    #[arg(long, short, allow_hyphen_values = true)]
    pub weight: String,
    /// Workout date (YYYY-MM-DD), defaults to today
    #[arg(long, short)]
    pub date: Option<String>,
    #[arg(long, short)]
    pub notes: Option<String>,
}

pub fn init() -> CmdResult {
    let session = Session::open()?;
    seed::ensure_default_exercises(&session.db, session.user.id)?;
    println!("initialized {}", session.user.email);
    Ok(())
}

pub fn log(args: LogArgs) -> CmdResult {
    let set = NewSet::parse(
        &args.exercise,
        &args.reps,
        &args.weight,
        args.date.as_deref(),
        args.notes.as_deref(),
    )?;

    let session = Session::open()?;
    session.db.log_set(session.user.id, &set)?;
    println!("Workout added!");
    Ok(())
}

pub fn list(limit: Option<usize>, json: bool) -> CmdResult {
    let session = Session::open()?;
    let limit = limit.unwrap_or(session.config.workouts.recent_limit);
    let workouts = session.db.recent_workouts(session.user.id, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&workouts)?);
        return Ok(());
    }

    if workouts.is_empty() {
        println!("No workouts yet.");
        return Ok(());
    }

    let units = &session.config.user.units;
    for workout in &workouts {
        if workout.notes.is_empty() {
            println!("{}", workout.date);
        } else {
            println!("{}  {}", workout.date, workout.notes);
        }
        for set in &workout.sets {
            match set.weight {
                Some(weight) => println!("  {} {} x {weight} {units}", set.exercise, set.reps),
                None => println!("  {} {}", set.exercise, set.reps),
            }
        }
    }
    Ok(())
}

pub fn exercises(json: bool) -> CmdResult {
    let session = Session::open()?;
    let exercises = session.db.exercises(session.user.id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&exercises)?);
    } else {
        for exercise in &exercises {
            println!("{:<24} {}", exercise.name, exercise.tag);
        }
    }
    Ok(())
}

pub fn seed_demo(rng_seed: Option<u64>) -> CmdResult {
    let session = Session::open()?;
    seed::ensure_default_exercises(&session.db, session.user.id)?;

    let mut rng = seed::demo_rng(rng_seed);
    let plan = DemoPlan::default();
    let summary = seed::seed_demo(&session.db, session.user.id, today(), &plan, &mut rng)?;
    println!(
        "Seeded demo data: {} workouts, {} sets.",
        summary.workouts, summary.sets
    );
    Ok(())
}
