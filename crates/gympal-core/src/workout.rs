//! Workout domain types and entry validation.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default tag for exercises created on the fly.
pub const DEFAULT_TAG: &str = "General";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub units: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub tag: String,
}

/// One set inside a workout, as listed in history views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    pub exercise: String,
    pub reps: i64,
    pub weight: Option<f64>,
}

/// A workout with its sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub id: i64,
    pub date: NaiveDate,
    pub notes: String,
    pub sets: Vec<SetEntry>,
}

/// Today's date in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// A validated set ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSet {
    pub exercise: String,
    pub reps: i64,
    pub weight: f64,
    pub date: NaiveDate,
    pub notes: String,
}

impl NewSet {
    /// Validate raw user input.
    ///
    /// `date` defaults to today when absent or blank.
    ///
    /// # Errors
    /// Returns the first failing field: exercise, reps, weight, then date.
    pub fn parse(
        exercise: &str,
        reps: &str,
        weight: &str,
        date: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let exercise = exercise.trim();
        if exercise.is_empty() {
            return Err(ValidationError::MissingExercise);
        }

        let reps = parse_reps(reps.trim())?;
        let weight = parse_weight(weight.trim())?;

        let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ValidationError::InvalidDate(raw.to_string()))?,
            None => today(),
        };

        Ok(Self {
            exercise: exercise.to_string(),
            reps,
            weight,
            date,
            notes: notes.unwrap_or_default().to_string(),
        })
    }
}

/// Whole digits only: rejects signs, decimals and zero.
fn parse_reps(raw: &str) -> Result<i64, ValidationError> {
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidReps);
    }
    match raw.parse::<i64>() {
        Ok(reps) if reps > 0 => Ok(reps),
        _ => Err(ValidationError::InvalidReps),
    }
}

fn parse_weight(raw: &str) -> Result<f64, ValidationError> {
    match raw.parse::<f64>() {
        Ok(weight) if weight.is_finite() && weight >= 0.0 => Ok(weight),
        _ => Err(ValidationError::InvalidWeight),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_happy_path() {
        let set = NewSet::parse(" Squat ", "5", "185", Some("2025-09-15"), Some("integration test"))
            .unwrap();
        assert_eq!(set.exercise, "Squat");
        assert_eq!(set.reps, 5);
        assert_eq!(set.weight, 185.0);
        assert_eq!(set.date, NaiveDate::from_ymd_opt(2025, 9, 15).unwrap());
        assert_eq!(set.notes, "integration test");
    }

    #[test]
    fn test_missing_exercise() {
        let err = NewSet::parse("  ", "5", "185", None, None).unwrap_err();
        assert_eq!(err, ValidationError::MissingExercise);
    }

    #[test]
    fn test_invalid_reps() {
        for reps in ["0", "-1", "2.5", "", "five", "+3"] {
            let err = NewSet::parse("Squat", reps, "185", None, None).unwrap_err();
            assert_eq!(err, ValidationError::InvalidReps, "reps {reps:?}");
        }
    }

    #[test]
    fn test_invalid_weight() {
        for weight in ["-5", "abc", "", "inf", "NaN"] {
            let err = NewSet::parse("Squat", "5", weight, None, None).unwrap_err();
            assert_eq!(err, ValidationError::InvalidWeight, "weight {weight:?}");
        }
    }

    #[test]
    fn test_zero_weight_is_allowed() {
        let set = NewSet::parse("Pull Up", "8", "0", None, None).unwrap();
        assert_eq!(set.weight, 0.0);
    }

    #[test]
    fn test_date_defaults_to_today() {
        let set = NewSet::parse("Squat", "5", "100", Some(""), None).unwrap();
        assert_eq!(set.date, today());
    }

    #[test]
    fn test_invalid_date() {
        let err = NewSet::parse("Squat", "5", "100", Some("15/09/2025"), None).unwrap_err();
        assert_eq!(err, ValidationError::InvalidDate("15/09/2025".to_string()));
    }
}
