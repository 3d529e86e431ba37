//! Property tests for the estimate, aggregation and forecast functions.

use chrono::{Duration, NaiveDate};
use gympal_core::{estimate_one_rep_max, linear_forecast, weekly_best, Observation};
use proptest::prelude::*;

proptest! {
    #[test]
    fn estimate_exceeds_weight(weight in 0.5f64..1000.0, reps in 1i64..100) {
        prop_assert!(estimate_one_rep_max(Some(weight), Some(reps)) > weight);
    }

    #[test]
    fn non_positive_reps_give_zero(weight in 0.0f64..1000.0, reps in -100i64..=0) {
        prop_assert_eq!(estimate_one_rep_max(Some(weight), Some(reps)), 0.0);
    }

    #[test]
    fn forecast_length_follows_point_count(
        values in prop::collection::vec(0.0f64..500.0, 0..12),
        weeks_ahead in 0usize..10,
    ) {
        let expected = if values.len() >= 2 { weeks_ahead } else { 0 };
        prop_assert_eq!(linear_forecast(&values, weeks_ahead).len(), expected);
    }

    #[test]
    fn weekly_points_are_sorted_unique_and_non_negative(
        sets in prop::collection::vec(
            (
                0i64..730,
                prop::option::of(-50.0f64..400.0),
                prop::option::of(-3i64..15),
            ),
            0..40,
        ),
    ) {
        let origin = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let observations: Vec<Observation> = sets
            .into_iter()
            .map(|(day, weight, reps)| Observation::new(origin + Duration::days(day), weight, reps))
            .collect();

        let points = weekly_best(&observations);
        prop_assert!(points.windows(2).all(|w| w[0].iso_week < w[1].iso_week));
        prop_assert!(points.iter().all(|p| p.best_estimate >= 0.0));

        let forecast = linear_forecast(
            &points.iter().map(|p| p.best_estimate).collect::<Vec<_>>(),
            4,
        );
        prop_assert_eq!(forecast.len(), if points.len() >= 2 { 4 } else { 0 });
    }
}
