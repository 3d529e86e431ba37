//! Weekly best-e1RM aggregation.
//!
//! Buckets observations by ISO-8601 week (Monday start, the year owning the
//! week's Thursday) and keeps the best estimate per week.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::estimate::{estimate_one_rep_max, round2};

/// One recorded set as supplied by storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub weight: Option<f64>,
    pub reps: Option<i64>,
}

impl Observation {
    pub fn new(date: NaiveDate, weight: Option<f64>, reps: Option<i64>) -> Self {
        Self { date, weight, reps }
    }

    /// Epley estimate for this set, `0.0` when a field is missing.
    pub fn estimate(&self) -> f64 {
        estimate_one_rep_max(self.weight, self.reps)
    }

    pub fn week_key(&self) -> WeekKey {
        WeekKey::from_date(self.date)
    }
}

/// ISO-8601 week identifier. Orders by year, then week number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl WeekKey {
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

/// Best estimate for one ISO week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPoint {
    /// Week label formatted `YYYY-Www`.
    pub iso_week: String,
    /// Best e1RM of the week, rounded to 2 decimals.
    #[serde(rename = "best_e1rm")]
    pub best_estimate: f64,
}

/// Reduce observations to one best-estimate point per ISO week.
///
/// Input order does not matter. Output is ascending by week; weeks without
/// observations are skipped, not zero-filled. Observations with missing or
/// non-positive fields contribute `0.0`, which never beats a real estimate.
pub fn weekly_best(observations: &[Observation]) -> Vec<WeeklyPoint> {
    let mut by_week: BTreeMap<WeekKey, f64> = BTreeMap::new();

    for obs in observations {
        let best = by_week.entry(obs.week_key()).or_insert(0.0);
        *best = best.max(obs.estimate());
    }

    by_week
        .into_iter()
        .map(|(key, best)| WeeklyPoint {
            iso_week: key.to_string(),
            best_estimate: round2(best),
        })
        .collect()
}
