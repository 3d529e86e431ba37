//! Weekly e1RM series plus forecast for one (user, exercise) pair.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::forecast::{linear_forecast, DEFAULT_WEEKS_AHEAD, MIN_POINTS};
use super::weekly::{weekly_best, Observation, WeeklyPoint};
use crate::error::{CoreError, Result};

/// Supplies the raw sets for one user and exercise name.
///
/// Implementations match the exercise name case-insensitively.
pub trait ObservationSource {
    fn observations(&self, user_id: i64, exercise: &str) -> Result<Vec<Observation>>;
}

/// Output of [`MetricsPipeline::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseMetrics {
    pub points: Vec<WeeklyPoint>,
    pub forecast: Vec<f64>,
}

impl ExerciseMetrics {
    /// Render as an ASCII table, forecast rows labeled `+1`, `+2`, ...
    pub fn render_table(&self, exercise: &str, units: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("\nWeekly Best e1RM: {exercise}\n"));
        output.push_str(&"=".repeat(32));
        output.push('\n');
        output.push_str(&format!("{:<12} {:>12}\n", "Week", format!("e1RM ({units})")));
        output.push_str(&"-".repeat(32));
        output.push('\n');

        for point in &self.points {
            output.push_str(&format!("{:<12} {:>12.2}\n", point.iso_week, point.best_estimate));
        }

        if !self.forecast.is_empty() {
            output.push_str(&"-".repeat(32));
            output.push_str("\nForecast\n");
            for (i, value) in self.forecast.iter().enumerate() {
                output.push_str(&format!("{:<12} {:>12.2}\n", format!("+{}", i + 1), value));
            }
        }

        output
    }
}

/// Runs aggregation then forecasting over observations from `source`.
pub struct MetricsPipeline<'a, S: ObservationSource + ?Sized> {
    source: &'a S,
    weeks_ahead: usize,
}

impl<'a, S: ObservationSource + ?Sized> MetricsPipeline<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            weeks_ahead: DEFAULT_WEEKS_AHEAD,
        }
    }

    pub fn with_weeks_ahead(mut self, weeks_ahead: usize) -> Self {
        self.weeks_ahead = weeks_ahead;
        self
    }

    /// Compute the weekly series and forecast.
    ///
    /// # Errors
    /// Returns [`CoreError::NoData`] when no week has any recorded set, or
    /// the source's error if fetching fails.
    pub fn run(&self, user_id: i64, exercise: &str) -> Result<ExerciseMetrics> {
        let observations = self.source.observations(user_id, exercise)?;
        let points = weekly_best(&observations);

        if points.is_empty() {
            return Err(CoreError::NoData {
                exercise: exercise.to_string(),
            });
        }

        let forecast = if points.len() >= MIN_POINTS {
            let values: Vec<f64> = points.iter().map(|p| p.best_estimate).collect();
            linear_forecast(&values, self.weeks_ahead)
        } else {
            Vec::new()
        };

        debug!(
            user_id,
            exercise,
            observations = observations.len(),
            weeks = points.len(),
            forecast = forecast.len(),
            "metrics computed"
        );

        Ok(ExerciseMetrics { points, forecast })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DatabaseError;
    use chrono::NaiveDate;

    struct FixedSource(Vec<Observation>);

    impl ObservationSource for FixedSource {
        fn observations(&self, _user_id: i64, _exercise: &str) -> Result<Vec<Observation>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    impl ObservationSource for FailingSource {
        fn observations(&self, _user_id: i64, _exercise: &str) -> Result<Vec<Observation>> {
            Err(DatabaseError::Locked.into())
        }
    }

    fn obs(y: i32, m: u32, d: u32, weight: f64, reps: i64) -> Observation {
        Observation::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), Some(weight), Some(reps))
    }

    #[test]
    fn test_empty_source_is_no_data() {
        let source = FixedSource(Vec::new());
        let err = MetricsPipeline::new(&source).run(1, "Squat").unwrap_err();
        assert!(matches!(err, CoreError::NoData { ref exercise } if exercise == "Squat"));
    }

    #[test]
    fn test_single_week_has_no_forecast() {
        let source = FixedSource(vec![obs(2025, 9, 1, 200.0, 5), obs(2025, 9, 3, 210.0, 5)]);
        let metrics = MetricsPipeline::new(&source).run(1, "Squat").unwrap();
        assert_eq!(metrics.points.len(), 1);
        assert_eq!(metrics.points[0].best_estimate, 245.0);
        assert!(metrics.forecast.is_empty());
    }

    #[test]
    fn test_two_weeks_forecast_four() {
        let source = FixedSource(vec![
            obs(2025, 9, 1, 200.0, 5),
            obs(2025, 9, 3, 210.0, 5),
            obs(2025, 9, 10, 220.0, 5),
        ]);
        let metrics = MetricsPipeline::new(&source).run(1, "Squat").unwrap();
        assert_eq!(metrics.points[1].best_estimate, 256.67);
        assert_eq!(metrics.forecast.len(), 4);
        assert!(metrics.forecast[0] >= 256.67);
    }

    #[test]
    fn test_weeks_ahead_is_configurable() {
        let source = FixedSource(vec![obs(2025, 9, 1, 200.0, 5), obs(2025, 9, 10, 220.0, 5)]);
        let metrics = MetricsPipeline::new(&source)
            .with_weeks_ahead(8)
            .run(1, "Squat")
            .unwrap();
        assert_eq!(metrics.forecast.len(), 8);
    }

    #[test]
    fn test_source_error_propagates() {
        let err = MetricsPipeline::new(&FailingSource).run(1, "Squat").unwrap_err();
        assert!(matches!(err, CoreError::Database(DatabaseError::Locked)));
    }

    #[test]
    fn test_render_table_lists_weeks_and_forecast() {
        let metrics = ExerciseMetrics {
            points: vec![WeeklyPoint {
                iso_week: "2025-W36".to_string(),
                best_estimate: 245.0,
            }],
            forecast: vec![250.5],
        };
        let table = metrics.render_table("Squat", "lb");
        assert!(table.contains("Weekly Best e1RM: Squat"));
        assert!(table.contains("2025-W36"));
        assert!(table.contains("245.00"));
        assert!(table.contains("+1"));
        assert!(table.contains("250.50"));
    }
}
