//! SQLite-based workout storage.
//!
//! Provides persistent storage for:
//! - Users and their exercise library
//! - Workouts and the sets logged in them
//! - The per-exercise observation query feeding the metrics pipeline

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{data_dir, migrations};
use crate::error::{CoreError, DatabaseError, Result};
use crate::metrics::{Observation, ObservationSource};
use crate::workout::{Exercise, NewSet, SetEntry, User, WorkoutSummary, DEFAULT_TAG};

/// Database file name inside the data directory.
pub const DB_FILE: &str = "gympal.db";

/// Ids created by [`Database::log_set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedSet {
    pub exercise_id: i64,
    pub workout_id: i64,
    pub set_id: i64,
}

/// One line of the CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub date: NaiveDate,
    pub exercise: String,
    pub reps: i64,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

/// SQLite database for workouts.
pub struct Database {
    conn: Connection,
}

fn parse_date(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data dir>/gympal.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join(DB_FILE);
        Self::open_at(&path)
    }

    /// Open (or create) a database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "database opened");
        Self::init(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Run a trivial query to confirm the connection is usable.
    pub fn health_check(&self) -> Result<(), DatabaseError> {
        self.conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    /// Dump table and index DDL, tables first.
    pub fn schema_sql(&self) -> Result<String, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT sql FROM sqlite_master
             WHERE sql IS NOT NULL
               AND name NOT LIKE 'sqlite_%'
               AND type IN ('table', 'index')
             ORDER BY CASE type WHEN 'table' THEN 0 ELSE 1 END, name",
        )?;
        let statements = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(statements
            .iter()
            .map(|sql| format!("{};\n\n", sql.trim()))
            .collect())
    }

    // ── Users ────────────────────────────────────────────────────────

    /// Look up a user by email, creating it with `units` if missing.
    pub fn get_or_create_user(&self, email: &str, units: &str) -> Result<User, DatabaseError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO users (email, units) VALUES (?1, ?2)",
            params![email, units],
        )?;
        if inserted > 0 {
            info!(email, "user created");
        }
        let user = self.conn.query_row(
            "SELECT id, email, units FROM users WHERE email = ?1",
            params![email],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    units: row.get(2)?,
                })
            },
        )?;
        Ok(user)
    }

    // ── Exercises ────────────────────────────────────────────────────

    /// Find an exercise by exact name.
    pub fn find_exercise(
        &self,
        user_id: i64,
        name: &str,
    ) -> Result<Option<Exercise>, DatabaseError> {
        let exercise = self
            .conn
            .query_row(
                "SELECT id, user_id, name, tag FROM exercises WHERE user_id = ?1 AND name = ?2",
                params![user_id, name],
                |row| {
                    Ok(Exercise {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        name: row.get(2)?,
                        tag: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(exercise)
    }

    /// Return the exercise named `name`, creating it with `tag` if missing.
    pub fn ensure_exercise(
        &self,
        user_id: i64,
        name: &str,
        tag: &str,
    ) -> Result<Exercise, DatabaseError> {
        if let Some(existing) = self.find_exercise(user_id, name)? {
            return Ok(existing);
        }
        self.conn.execute(
            "INSERT INTO exercises (user_id, name, tag) VALUES (?1, ?2, ?3)",
            params![user_id, name, tag],
        )?;
        debug!(user_id, exercise = name, tag, "exercise created");
        Ok(Exercise {
            id: self.conn.last_insert_rowid(),
            user_id,
            name: name.to_string(),
            tag: tag.to_string(),
        })
    }

    /// All exercises of a user, sorted by name.
    pub fn exercises(&self, user_id: i64) -> Result<Vec<Exercise>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, tag FROM exercises WHERE user_id = ?1 ORDER BY name",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(Exercise {
                id: row.get(0)?,
                user_id: row.get(1)?,
                name: row.get(2)?,
                tag: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn exercise_names(&self, user_id: i64) -> Result<Vec<String>, DatabaseError> {
        Ok(self.exercises(user_id)?.into_iter().map(|e| e.name).collect())
    }

    // ── Workouts and sets ────────────────────────────────────────────

    pub fn create_workout(
        &self,
        user_id: i64,
        date: NaiveDate,
        notes: &str,
    ) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO workouts (user_id, date, notes) VALUES (?1, ?2, ?3)",
            params![user_id, date.to_string(), notes],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn add_set(
        &self,
        workout_id: i64,
        exercise_id: i64,
        reps: i64,
        weight: Option<f64>,
    ) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO sets (workout_id, exercise_id, reps, weight) VALUES (?1, ?2, ?3, ?4)",
            params![workout_id, exercise_id, reps, weight],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Store a validated set as a new workout.
    ///
    /// The exercise is looked up by exact name and created with the default
    /// tag if missing. All three inserts share one transaction.
    pub fn log_set(&self, user_id: i64, set: &NewSet) -> Result<LoggedSet, DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;

        let exercise = self.ensure_exercise(user_id, &set.exercise, DEFAULT_TAG)?;
        let workout_id = self.create_workout(user_id, set.date, &set.notes)?;
        let set_id = self.add_set(workout_id, exercise.id, set.reps, Some(set.weight))?;

        tx.commit()?;

        info!(
            user = user_id,
            exercise = %set.exercise,
            reps = set.reps,
            weight = set.weight,
            date = %set.date,
            "workout_created"
        );

        Ok(LoggedSet {
            exercise_id: exercise.id,
            workout_id,
            set_id,
        })
    }

    /// Most recent workouts first, each with its sets.
    pub fn recent_workouts(
        &self,
        user_id: i64,
        limit: usize,
    ) -> Result<Vec<WorkoutSummary>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, notes FROM workouts
             WHERE user_id = ?1
             ORDER BY date DESC, id DESC
             LIMIT ?2",
        )?;
        let workouts = stmt
            .query_map(params![user_id, limit as i64], |row| {
                let raw: String = row.get(1)?;
                Ok((row.get::<_, i64>(0)?, parse_date(1, &raw)?, row.get::<_, String>(2)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut sets_stmt = self.conn.prepare(
            "SELECT e.name, s.reps, s.weight
             FROM sets s
             JOIN exercises e ON e.id = s.exercise_id
             WHERE s.workout_id = ?1
             ORDER BY s.id",
        )?;

        let mut summaries = Vec::with_capacity(workouts.len());
        for (id, date, notes) in workouts {
            let sets = sets_stmt
                .query_map(params![id], |row| {
                    Ok(SetEntry {
                        exercise: row.get(0)?,
                        reps: row.get(1)?,
                        weight: row.get(2)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            summaries.push(WorkoutSummary { id, date, notes, sets });
        }
        Ok(summaries)
    }

    /// Every set of a user, newest workout first.
    pub fn export_rows(&self, user_id: i64) -> Result<Vec<ExportRow>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT w.date, e.name, s.reps, s.weight, w.notes
             FROM workouts w
             JOIN sets s ON s.workout_id = w.id
             JOIN exercises e ON e.id = s.exercise_id
             WHERE w.user_id = ?1
             ORDER BY w.date DESC, w.id DESC",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            let raw: String = row.get(0)?;
            Ok(ExportRow {
                date: parse_date(0, &raw)?,
                exercise: row.get(1)?,
                reps: row.get(2)?,
                weight: row.get(3)?,
                notes: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

impl ObservationSource for Database {
    /// Sets for `exercise` (case-insensitive), oldest first.
    fn observations(&self, user_id: i64, exercise: &str) -> Result<Vec<Observation>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT w.date, s.weight, s.reps
                 FROM workouts w
                 JOIN sets s ON s.workout_id = w.id
                 JOIN exercises e ON e.id = s.exercise_id
                 WHERE w.user_id = ?1 AND e.name = ?2 COLLATE NOCASE
                 ORDER BY w.date ASC",
            )
            .map_err(DatabaseError::from)?;
        let rows = stmt
            .query_map(params![user_id, exercise], |row| {
                let raw: String = row.get(0)?;
                Ok(Observation::new(parse_date(0, &raw)?, row.get(1)?, row.get(2)?))
            })
            .map_err(DatabaseError::from)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(CoreError::from)
    }
}
