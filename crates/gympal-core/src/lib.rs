//! # GymPal Core Library
//!
//! This library provides the core logic for GymPal, a personal strength
//! training tracker. It follows a CLI-first philosophy: every operation is
//! exposed by the `gympal-cli` binary, which stays a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Metrics**: Pure analytics turning logged sets into a weekly best
//!   estimated one-rep-max series and a short linear forecast
//! - **Storage**: SQLite-based workout storage and TOML-based configuration
//! - **Export**: CSV export of the full set history
//! - **Seed**: Default exercise library and demo history
//!
//! ## Key Components
//!
//! - [`MetricsPipeline`]: Aggregation and forecast for one exercise
//! - [`Database`]: Workout persistence, implements [`ObservationSource`]
//! - [`Config`]: Application configuration management

pub mod error;
pub mod export;
pub mod logging;
pub mod metrics;
pub mod seed;
pub mod storage;
pub mod workout;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use metrics::{
    estimate_one_rep_max, linear_forecast, weekly_best, ExerciseMetrics, MetricsPipeline,
    Observation, ObservationSource, WeekKey, WeeklyPoint, DEFAULT_WEEKS_AHEAD, MAX_WEEKS_AHEAD,
};
pub use storage::{Config, Database, ExportRow};
pub use workout::{Exercise, NewSet, SetEntry, User, WorkoutSummary};
