//! Default exercise library and demo data.

use chrono::{Duration, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use tracing::info;

use crate::error::DatabaseError;
use crate::storage::Database;

/// Exercises every new user starts with, as `(name, tag)`.
pub const DEFAULT_EXERCISES: [(&str, &str); 7] = [
    ("Squat", "Legs"),
    ("Bench Press", "Chest"),
    ("Deadlift", "Back"),
    ("Overhead Press", "Shoulders"),
    ("Barbell Curl", "Biceps"),
    ("Triceps Pushdown", "Triceps"),
    ("Lateral Raise", "Shoulders"),
];

/// Shape of the generated demo history.
#[derive(Debug, Clone)]
pub struct DemoPlan {
    pub exercise: &'static str,
    pub tag: &'static str,
    pub weeks: u32,
    pub sets_per_workout: u32,
    pub reps: i64,
    pub base_weight: f64,
    pub weekly_increment: f64,
    /// Workouts land on `week start + 0..=max_day_offset` days.
    pub max_day_offset: i64,
}

impl Default for DemoPlan {
    fn default() -> Self {
        Self {
            exercise: "Squat",
            tag: "Legs",
            weeks: 10,
            sets_per_workout: 5,
            reps: 5,
            base_weight: 135.0,
            weekly_increment: 5.0,
            max_day_offset: 2,
        }
    }
}

/// Summary of a demo seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub workouts: u32,
    pub sets: u32,
}

/// RNG for demo data; deterministic when `seed` is given.
pub fn demo_rng(seed: Option<u64>) -> Pcg64 {
    match seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_entropy(),
    }
}

/// Make sure the default exercise library exists for `user_id`.
pub fn ensure_default_exercises(db: &Database, user_id: i64) -> Result<(), DatabaseError> {
    for (name, tag) in DEFAULT_EXERCISES {
        db.ensure_exercise(user_id, name, tag)?;
    }
    Ok(())
}

/// Insert a progressive demo history ending before `today`.
///
/// The first workout falls `plan.weeks` weeks before `today`.
pub fn seed_demo<R: Rng>(
    db: &Database,
    user_id: i64,
    today: NaiveDate,
    plan: &DemoPlan,
    rng: &mut R,
) -> Result<SeedSummary, DatabaseError> {
    let exercise = db.ensure_exercise(user_id, plan.exercise, plan.tag)?;
    let start = today - Duration::weeks(i64::from(plan.weeks));

    let tx = db.conn().unchecked_transaction()?;
    let mut summary = SeedSummary { workouts: 0, sets: 0 };

    for week in 0..plan.weeks {
        let offset = rng.gen_range(0..=plan.max_day_offset);
        let date = start + Duration::weeks(i64::from(week)) + Duration::days(offset);
        let workout_id = db.create_workout(user_id, date, "Seeded workout")?;
        summary.workouts += 1;

        let weight = plan.base_weight + f64::from(week) * plan.weekly_increment;
        for _ in 0..plan.sets_per_workout {
            db.add_set(workout_id, exercise.id, plan.reps, Some(weight))?;
            summary.sets += 1;
        }
    }

    tx.commit()?;
    info!(
        user_id,
        exercise = plan.exercise,
        workouts = summary.workouts,
        sets = summary.sets,
        "demo data seeded"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricsPipeline, ObservationSource};

    fn setup() -> (Database, i64) {
        let db = Database::open_memory().unwrap();
        let user = db.get_or_create_user("default@local", "lb").unwrap();
        (db, user.id)
    }

    #[test]
    fn default_library_is_created_once() {
        let (db, user_id) = setup();
        ensure_default_exercises(&db, user_id).unwrap();
        ensure_default_exercises(&db, user_id).unwrap();
        let names = db.exercise_names(user_id).unwrap();
        assert_eq!(names.len(), DEFAULT_EXERCISES.len());
        assert_eq!(names[0], "Barbell Curl");
    }

    #[test]
    fn demo_seed_builds_ten_progressive_weeks() {
        let (db, user_id) = setup();
        let today = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
        let mut rng = demo_rng(Some(7));
        let summary = seed_demo(&db, user_id, today, &DemoPlan::default(), &mut rng).unwrap();
        assert_eq!(summary, SeedSummary { workouts: 10, sets: 50 });

        let obs = db.observations(user_id, "squat").unwrap();
        assert_eq!(obs.len(), 50);
        assert!(obs.iter().all(|o| o.reps == Some(5)));
        assert_eq!(obs.first().unwrap().weight, Some(135.0));
        assert_eq!(obs.last().unwrap().weight, Some(180.0));
        assert!(obs.iter().all(|o| o.date < today));

        let metrics = MetricsPipeline::new(&db).run(user_id, "Squat").unwrap();
        assert_eq!(metrics.points.len(), 10);
        assert_eq!(metrics.forecast.len(), 4);
        assert!(metrics.forecast[0] > metrics.points[9].best_estimate);
    }

    #[test]
    fn same_seed_same_dates() {
        let today = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
        let dates = |seed| {
            let (db, user_id) = setup();
            let mut rng = demo_rng(Some(seed));
            seed_demo(&db, user_id, today, &DemoPlan::default(), &mut rng).unwrap();
            db.observations(user_id, "Squat")
                .unwrap()
                .into_iter()
                .map(|o| o.date)
                .collect::<Vec<_>>()
        };
        assert_eq!(dates(42), dates(42));
    }
}
