//! Course records and the weekday they fall on.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::intervals;

/// Number of teaching days shown in a week.
pub const DAYS_PER_WEEK: usize = 5;

/// A teaching day, Monday through Friday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchoolDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl SchoolDay {
    pub const ALL: [SchoolDay; DAYS_PER_WEEK] = [
        SchoolDay::Monday,
        SchoolDay::Tuesday,
        SchoolDay::Wednesday,
        SchoolDay::Thursday,
        SchoolDay::Friday,
    ];

    /// 1-based day number (Monday = 1).
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    /// 0-based grid column.
    pub fn index(self) -> usize {
        match self {
            SchoolDay::Monday => 0,
            SchoolDay::Tuesday => 1,
            SchoolDay::Wednesday => 2,
            SchoolDay::Thursday => 3,
            SchoolDay::Friday => 4,
        }
    }

    /// Parse a 1-based day number.
    pub fn from_number(n: i64) -> Result<Self, ValidationError> {
        usize::try_from(n)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(ValidationError::InvalidDay(n))
    }

    /// Lowercase English name, as used for timetable JSON keys.
    pub fn key(self) -> &'static str {
        match self {
            SchoolDay::Monday => "monday",
            SchoolDay::Tuesday => "tuesday",
            SchoolDay::Wednesday => "wednesday",
            SchoolDay::Thursday => "thursday",
            SchoolDay::Friday => "friday",
        }
    }

    /// Three-letter label for column headers.
    pub fn short_name(self) -> &'static str {
        match self {
            SchoolDay::Monday => "Mon",
            SchoolDay::Tuesday => "Tue",
            SchoolDay::Wednesday => "Wed",
            SchoolDay::Thursday => "Thu",
            SchoolDay::Friday => "Fri",
        }
    }

    pub fn to_chrono(self) -> chrono::Weekday {
        match self {
            SchoolDay::Monday => chrono::Weekday::Mon,
            SchoolDay::Tuesday => chrono::Weekday::Tue,
            SchoolDay::Wednesday => chrono::Weekday::Wed,
            SchoolDay::Thursday => chrono::Weekday::Thu,
            SchoolDay::Friday => chrono::Weekday::Fri,
        }
    }

    /// The school day for a calendar weekday, `None` on weekends.
    pub fn from_chrono(day: chrono::Weekday) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.to_chrono() == day)
    }
}

impl fmt::Display for SchoolDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// One scheduled occurrence of a course on a given weekday.
///
/// Periods and weeks are kept sorted, deduplicated and strictly positive.
/// Records are never edited in place; an update builds a new `Course`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    /// Storage row id, `0` until persisted.
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub teacher: String,
    pub location: String,
    pub day: SchoolDay,
    periods: Vec<u32>,
    weeks: Vec<u32>,
}

impl Course {
    /// Build a course, normalising period and week order.
    ///
    /// # Errors
    /// Returns an error if `periods` or `weeks` is empty, contains zero, or
    /// goes past [`intervals::MAX_VALUE`].
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        teacher: impl Into<String>,
        location: impl Into<String>,
        day: SchoolDay,
        periods: impl IntoIterator<Item = u32>,
        weeks: impl IntoIterator<Item = u32>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: 0,
            name: name.into(),
            kind: kind.into(),
            teacher: teacher.into(),
            location: location.into(),
            day,
            periods: normalize("periods", periods)?,
            weeks: normalize("weeks", weeks)?,
        })
    }

    /// The same course carrying a storage id.
    pub fn with_id(self, id: i64) -> Self {
        Self { id, ..self }
    }

    pub fn periods(&self) -> &[u32] {
        &self.periods
    }

    pub fn weeks(&self) -> &[u32] {
        &self.weeks
    }

    pub fn first_period(&self) -> u32 {
        self.periods.first().copied().unwrap_or_default()
    }

    pub fn last_period(&self) -> u32 {
        self.periods.last().copied().unwrap_or_default()
    }

    pub fn runs_in_week(&self, week: u32) -> bool {
        self.weeks.binary_search(&week).is_ok()
    }

    /// Identity used to decide whether two occurrences are the same course.
    pub fn key(&self) -> CourseKey<'_> {
        CourseKey {
            name: &self.name,
            teacher: &self.teacher,
            location: &self.location,
            day: self.day,
        }
    }

    pub fn is_same_course(&self, other: &Course) -> bool {
        self.key() == other.key()
    }
}

/// Name, teacher, location and day: the fields that identify a course.
///
/// Kind, periods and weeks are not part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CourseKey<'a> {
    pub name: &'a str,
    pub teacher: &'a str,
    pub location: &'a str,
    pub day: SchoolDay,
}

fn normalize(
    field: &str,
    values: impl IntoIterator<Item = u32>,
) -> Result<Vec<u32>, ValidationError> {
    let mut values: Vec<u32> = values.into_iter().collect();
    values.sort_unstable();
    values.dedup();
    if values.is_empty() {
        return Err(ValidationError::EmptyCollection(field.to_string()));
    }
    if values[0] == 0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: "values must be positive".into(),
        });
    }
    if values[values.len() - 1] > intervals::MAX_VALUE {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("values must not exceed {}", intervals::MAX_VALUE),
        });
    }
    Ok(values)
}
