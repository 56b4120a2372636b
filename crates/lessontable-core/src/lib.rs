//! # Lessontable Core Library
//!
//! This library provides the core logic of the Lessontable class timetable.
//! All operations are available to the standalone CLI binary; any other
//! front end is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Intervals**: the `"1-3,5,7-9"` encoding used for weeks and periods
//! - **Grid**: places one week's courses into a weekday × period matrix,
//!   merging adjacent occurrences of the same course into one block
//! - **Term**: current teaching week, week dates and week paging
//! - **Import**: JSON timetable import that skips unreadable entries
//! - **Storage**: SQLite timetable storage and TOML configuration
//!
//! ## Key Components
//!
//! - [`Course`]: one occurrence of a course on a weekday
//! - [`WeekGrid`]: course placement for one week
//! - [`TermCalendar`]: week arithmetic from the term start date
//! - [`LessonDb`]: timetable persistence
//! - [`Config`]: application configuration management

pub mod course;
pub mod error;
pub mod grid;
pub mod import;
pub mod intervals;
pub mod period_times;
pub mod snapshot;
pub mod storage;
pub mod term;

pub use course::{Course, CourseKey, SchoolDay, DAYS_PER_WEEK};
pub use error::{ConfigError, CoreError, DatabaseError, ImportError, ValidationError};
pub use grid::{CourseBlock, GridCell, GridLayout, WeekGrid};
pub use import::{import_file, parse_timetable, ImportReport};
pub use period_times::{PeriodTime, TimeSettings};
pub use snapshot::{load_snapshot, Snapshot};
pub use storage::{Config, LessonDb};
pub use term::{CurrentWeek, TermCalendar, TermStatus, WeekPager};
