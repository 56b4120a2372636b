//! Database schema migrations for lessontable.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Schema version after all migrations have run.
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
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: courses, per-period times and the settings row.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS course (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            type        TEXT,
            teacher     TEXT,
            classroom   TEXT,
            day_of_week INTEGER NOT NULL,
            time        TEXT,
            weeks       TEXT
        );

        CREATE TABLE IF NOT EXISTS time_settings (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            period_number   INTEGER NOT NULL,
            start_time      TEXT NOT NULL,
            end_time        TEXT NOT NULL,
            first_week_date TEXT
        );

        CREATE TABLE IF NOT EXISTS settings (
            max_periods INTEGER NOT NULL
        );",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: term start date on the settings row, day index on courses.
///
/// `time_settings.first_week_date` is kept and still written, but a start
/// date can now be stored before any period times exist.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "ALTER TABLE settings ADD COLUMN first_week_date TEXT;
         CREATE INDEX IF NOT EXISTS idx_course_day ON course(day_of_week);",
    )?;

    // Backfill from the per-period rows of older databases
    tx.execute(
        "UPDATE settings SET first_week_date = (
             SELECT first_week_date FROM time_settings
             WHERE first_week_date IS NOT NULL AND first_week_date != ''
             ORDER BY period_number LIMIT 1
         )
         WHERE first_week_date IS NULL",
        [],
    )?;

    set_schema_version(&tx, 2)?;
    tx.commit()
}
