//! Read-only view of everything needed to show the timetable.
//!
//! Loading never fails: a storage error is logged and produces an empty
//! snapshot, which callers treat as "nothing imported yet".

use std::path::PathBuf;

use crate::course::Course;
use crate::error::Result;
use crate::grid::{GridLayout, WeekGrid};
use crate::period_times::TimeSettings;
use crate::storage::LessonDb;
use crate::term::TermCalendar;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub courses: Vec<Course>,
    pub time_settings: TimeSettings,
    pub max_periods: u32,
}

impl Snapshot {
    pub fn empty(default_max_periods: u32) -> Self {
        Self {
            courses: Vec::new(),
            time_settings: TimeSettings::default(),
            max_periods: default_max_periods,
        }
    }

    /// Read the snapshot, propagating storage errors.
    pub fn try_load(db: &LessonDb, default_max_periods: u32) -> Result<Self> {
        Ok(Self {
            courses: db.list_courses()?,
            time_settings: db.time_settings()?,
            max_periods: db.max_periods(default_max_periods)?,
        })
    }

    /// Read the snapshot, treating storage errors as "no data".
    pub fn load(db: &LessonDb, default_max_periods: u32) -> Self {
        Self::try_load(db, default_max_periods).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read timetable, treating as empty");
            Self::empty(default_max_periods)
        })
    }

    /// True when there is nothing to show and an import should be offered.
    pub fn needs_import(&self) -> bool {
        self.courses.is_empty()
    }

    /// Term calendar, once a start date has been set.
    pub fn term(&self, max_week: u32) -> Option<TermCalendar> {
        self.time_settings
            .first_week_date
            .map(|start| TermCalendar::new(start, max_week))
    }

    pub fn grid(&self, week: u32, layout: &GridLayout) -> WeekGrid<'_> {
        WeekGrid::build(&self.courses, week, layout)
    }
}

/// Open the database at `path` and read a snapshot on the blocking pool.
///
/// Resolves to a single value; open or read failures resolve to an empty
/// snapshot.
pub async fn load_snapshot(path: PathBuf, default_max_periods: u32) -> Snapshot {
    let task = tokio::task::spawn_blocking(move || {
        LessonDb::open_at(&path).map(|db| Snapshot::load(&db, default_max_periods))
    });

    match task.await {
        Ok(Ok(snapshot)) => snapshot,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "failed to open timetable database, treating as empty");
            Snapshot::empty(default_max_periods)
        }
        Err(e) => {
            tracing::warn!(error = %e, "timetable read task failed");
            Snapshot::empty(default_max_periods)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::SchoolDay;

    #[test]
    fn empty_database_needs_import() {
        let db = LessonDb::open_memory().unwrap();
        let snapshot = Snapshot::load(&db, 12);
        assert!(snapshot.needs_import());
        assert_eq!(snapshot.max_periods, 12);
        assert!(snapshot.term(20).is_none());
    }

    #[test]
    fn broken_schema_degrades_to_empty() {
        let db = LessonDb::open_memory().unwrap();
        db.conn().execute_batch("DROP TABLE course;").unwrap();
        assert!(Snapshot::try_load(&db, 12).is_err());
        assert_eq!(Snapshot::load(&db, 12), Snapshot::empty(12));
    }

    #[test]
    fn snapshot_builds_grid() {
        let db = LessonDb::open_memory().unwrap();
        let course = Course::new("Math", "", "", "", SchoolDay::Monday, [1, 2], [1]).unwrap();
        db.replace_courses(&[course], None).unwrap();

        let snapshot = Snapshot::load(&db, 12);
        assert!(!snapshot.needs_import());
        assert_eq!(snapshot.max_periods, 2);
        let grid = snapshot.grid(1, &GridLayout::default());
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.visible_cells().count(), 1);
    }

    #[tokio::test]
    async fn load_snapshot_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lessontable.db");
        {
            let db = LessonDb::open_at(&path).unwrap();
            let course = Course::new("Art", "", "", "", SchoolDay::Friday, [3], [1, 2]).unwrap();
            db.replace_courses(&[course], None).unwrap();
        }

        let snapshot = load_snapshot(path, 12).await;
        assert_eq!(snapshot.courses.len(), 1);
        assert_eq!(snapshot.courses[0].name, "Art");
    }

    #[tokio::test]
    async fn load_snapshot_survives_unopenable_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a database file
        let snapshot = load_snapshot(dir.path().to_path_buf(), 9).await;
        assert!(snapshot.needs_import());
        assert_eq!(snapshot.max_periods, 9);
    }
}
