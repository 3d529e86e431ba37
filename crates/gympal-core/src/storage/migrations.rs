//! Database schema migrations for gympal.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use indoc::indoc;
use rusqlite::{Connection, Result as SqliteResult};
use tracing::{info, warn};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const CURRENT_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    if current_version < CURRENT_VERSION {
        info!(from = current_version, to = CURRENT_VERSION, "schema migrated");
    }
    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: users, exercises, workouts and sets.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(indoc! {"
        CREATE TABLE IF NOT EXISTS users (
            id     INTEGER PRIMARY KEY AUTOINCREMENT,
            email  VARCHAR(255) NOT NULL UNIQUE,
            units  VARCHAR(8) NOT NULL DEFAULT 'lb'
        );

        CREATE TABLE IF NOT EXISTS exercises (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id  INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name     VARCHAR(80) NOT NULL,
            tag      VARCHAR(24) NOT NULL DEFAULT 'General',
            CONSTRAINT uq_exercise_user_name UNIQUE (user_id, name)
        );

        CREATE TABLE IF NOT EXISTS workouts (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id  INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            date     TEXT NOT NULL,
            notes    VARCHAR(255) NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS sets (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            workout_id   INTEGER NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
            exercise_id  INTEGER NOT NULL REFERENCES exercises(id),
            reps         INTEGER NOT NULL,
            weight       REAL
        );
    "})?;

    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: indexes for the per-user history and per-exercise metrics queries.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(indoc! {"
        CREATE INDEX IF NOT EXISTS ix_workouts_user_date ON workouts(user_id, date);
        CREATE INDEX IF NOT EXISTS ix_sets_exercise ON sets(exercise_id);
    "})?;

    set_schema_version(&tx, 2)?;
    tx.commit()
}
