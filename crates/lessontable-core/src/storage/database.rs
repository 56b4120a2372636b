//! SQLite-based timetable storage.
//!
//! Provides persistent storage for:
//! - Imported courses
//! - Per-period start/end times
//! - The settings row (max periods, term start date)
//!
//! The handle is opened once by the caller and passed to whatever needs it;
//! the connection closes when the handle is dropped.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::{data_dir, migrations};
use crate::course::{Course, SchoolDay};
use crate::error::{DatabaseError, Result};
use crate::intervals;
use crate::period_times::{self, PeriodTime, TimeSettings};
use crate::term;

/// File name of the database inside the data directory.
pub const DB_FILE_NAME: &str = "lessontable.db";

/// SQLite database holding the timetable.
pub struct LessonDb {
    conn: Connection,
}

impl LessonDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/lessontable/lessontable.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(data_dir()?.join(DB_FILE_NAME))
    }

    /// Open the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // === Courses ===

    /// Replace the stored timetable with `courses`.
    ///
    /// Period times and settings are cleared as well, since they describe
    /// the previous timetable. When `max_periods` is given it becomes the
    /// new max-periods setting. Runs in one transaction: on error the prior
    /// data is untouched.
    ///
    /// # Errors
    /// Returns an error if any statement fails.
    pub fn replace_courses(&self, courses: &[Course], max_periods: Option<u32>) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM course", [])?;
        tx.execute("DELETE FROM time_settings", [])?;
        tx.execute("DELETE FROM settings", [])?;
        if let Some(max_periods) = max_periods {
            tx.execute(
                "INSERT INTO settings (max_periods, first_week_date) VALUES (?1, NULL)",
                params![max_periods],
            )?;
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO course (name, type, teacher, classroom, day_of_week, time, weeks)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for course in courses {
                stmt.execute(params![
                    course.name,
                    course.kind,
                    course.teacher,
                    course.location,
                    course.day.number(),
                    intervals::join(course.periods()),
                    intervals::encode(course.weeks()),
                ])?;
            }
        }

        tx.commit()?;
        tracing::info!(count = courses.len(), ?max_periods, "stored imported courses");
        Ok(courses.len())
    }

    /// All stored courses, ordered by day then period.
    ///
    /// Rows that no longer describe a valid course are skipped with a
    /// warning.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn list_courses(&self) -> Result<Vec<Course>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, type, teacher, classroom, day_of_week, time, weeks
             FROM course
             ORDER BY day_of_week ASC, time ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(CourseRow {
                id: row.get(0)?,
                name: row.get(1)?,
                kind: row.get(2)?,
                teacher: row.get(3)?,
                location: row.get(4)?,
                day: row.get(5)?,
                time: row.get(6)?,
                weeks: row.get(7)?,
            })
        })?;

        let mut courses = Vec::new();
        for row in rows {
            let row = row?;
            let id = row.id;
            match row.into_course() {
                Ok(course) => courses.push(course),
                Err(e) => tracing::warn!(id, error = %e, "skipping invalid course row"),
            }
        }
        courses.sort_by_key(|c| (c.day, c.first_period()));
        Ok(courses)
    }

    /// Whether any course has been imported.
    pub fn has_courses(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM course", [], |row| row.get(0))?;
        Ok(count > 0)
    }

    // === Period times and settings ===

    /// Replace period times, the start date and the max-periods setting.
    ///
    /// # Errors
    /// Returns an error if any statement fails; nothing is written then.
    pub fn save_time_settings(&self, settings: &TimeSettings, max_periods: u32) -> Result<()> {
        let date = settings.first_week_date.map(term::format_date);
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM time_settings", [])?;
        tx.execute("DELETE FROM settings", [])?;
        tx.execute(
            "INSERT INTO settings (max_periods, first_week_date) VALUES (?1, ?2)",
            params![max_periods, date],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO time_settings (period_number, start_time, end_time, first_week_date)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for period in &settings.periods {
                stmt.execute(params![
                    period.period,
                    period.start_text(),
                    period.end_text(),
                    date,
                ])?;
            }
        }

        tx.commit()?;
        tracing::info!(periods = settings.periods.len(), max_periods, "saved time settings");
        Ok(())
    }

    /// Stored period times and start date.
    ///
    /// Period rows whose times cannot be parsed are skipped with a warning.
    pub fn time_settings(&self) -> Result<TimeSettings> {
        let mut stmt = self.conn.prepare(
            "SELECT period_number, start_time, end_time
             FROM time_settings
             ORDER BY period_number ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, u32>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut settings = TimeSettings {
            first_week_date: self.first_week_date()?,
            periods: Vec::new(),
        };
        for row in rows {
            let (period, start, end) = row?;
            match (period_times::parse_clock(&start), period_times::parse_clock(&end)) {
                (Ok(start), Ok(end)) => settings.set_period(PeriodTime::new(period, start, end)),
                (Err(e), _) | (_, Err(e)) => {
                    tracing::warn!(period, error = %e, "skipping invalid period time row");
                }
            }
        }
        Ok(settings)
    }

    /// Term start date, from the settings row or else the first period row.
    pub fn first_week_date(&self) -> Result<Option<NaiveDate>> {
        let from_settings: Option<String> = self
            .conn
            .query_row("SELECT first_week_date FROM settings LIMIT 1", [], |row| {
                row.get::<_, Option<String>>(0)
            })
            .optional()?
            .flatten();

        let text = match from_settings {
            Some(text) => Some(text),
            None => self
                .conn
                .query_row(
                    "SELECT first_week_date FROM time_settings
                     WHERE first_week_date IS NOT NULL
                     ORDER BY period_number LIMIT 1",
                    [],
                    |row| row.get::<_, String>(0),
                )
                .optional()?,
        };

        Ok(text.and_then(|text| match term::parse_date(&text) {
            Ok(date) => Some(date),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring stored term start date");
                None
            }
        }))
    }

    /// Set only the term start date, keeping period times.
    pub fn set_first_week_date(&self, date: NaiveDate) -> Result<()> {
        let mut settings = self.time_settings()?;
        settings.first_week_date = Some(date);
        let max_periods = self.max_periods(0)?;
        self.save_time_settings(&settings, max_periods)
    }

    /// Set only the max-periods setting, keeping the start date.
    pub fn set_max_periods(&self, max_periods: u32) -> Result<()> {
        let date: Option<String> = self
            .conn
            .query_row("SELECT first_week_date FROM settings LIMIT 1", [], |row| {
                row.get::<_, Option<String>>(0)
            })
            .optional()?
            .flatten();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM settings", [])?;
        tx.execute(
            "INSERT INTO settings (max_periods, first_week_date) VALUES (?1, ?2)",
            params![max_periods, date],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// The max-periods setting, if one has been saved.
    pub fn stored_max_periods(&self) -> Result<Option<u32>> {
        Ok(self
            .conn
            .query_row("SELECT max_periods FROM settings LIMIT 1", [], |row| row.get(0))
            .optional()?)
    }

    /// Number of periods per day: the saved setting, otherwise the highest
    /// period any stored course uses, otherwise `default`.
    pub fn max_periods(&self, default: u32) -> Result<u32> {
        if let Some(n) = self.stored_max_periods()?.filter(|n| *n > 0) {
            return Ok(n);
        }
        let derived = self
            .list_courses()?
            .iter()
            .map(Course::last_period)
            .max();
        Ok(derived.unwrap_or(default))
    }
}

struct CourseRow {
    id: i64,
    name: String,
    kind: Option<String>,
    teacher: Option<String>,
    location: Option<String>,
    day: i64,
    time: Option<String>,
    weeks: Option<String>,
}

impl CourseRow {
    fn into_course(self) -> std::result::Result<Course, crate::error::ValidationError> {
        let day = SchoolDay::from_number(self.day)?;
        let periods = intervals::decode(self.time.as_deref().unwrap_or_default());
        let weeks = intervals::decode(self.weeks.as_deref().unwrap_or_default());
        Ok(Course::new(
            self.name,
            self.kind.unwrap_or_default(),
            self.teacher.unwrap_or_default(),
            self.location.unwrap_or_default(),
            day,
            periods,
            weeks,
        )?
        .with_id(self.id))
    }
}
