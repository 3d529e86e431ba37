//! Strength analytics for GymPal
//!
//! Turns raw sets into a weekly best-e1RM series and projects a short linear
//! trend. Every function here is pure: storage is reached only through the
//! [`ObservationSource`] trait.

mod estimate;
mod forecast;
mod pipeline;
mod weekly;

pub use estimate::estimate_one_rep_max;

pub use weekly::{weekly_best, Observation, WeekKey, WeeklyPoint};

pub use forecast::{
    linear_forecast, TrendLine, DEFAULT_WEEKS_AHEAD, MAX_WEEKS_AHEAD, MIN_POINTS,
};

pub use pipeline::{ExerciseMetrics, MetricsPipeline, ObservationSource};
