//! JSON timetable import.
//!
//! The document is an object keyed by lowercase weekday (`monday` ..
//! `friday`); each value is an array of course entries:
//!
//! ```json
//! {
//!   "monday": [
//!     { "name": "Calculus", "type": "Lecture", "teacher": "Dr. Lin",
//!       "classroom": "A101", "weeks": ["1-8", "10"], "time": [1, 2] }
//!   ]
//! }
//! ```
//!
//! Only a document that is not a JSON object fails the import. Entries that
//! cannot be read, or end up with no weeks or no periods, are logged and
//! counted as skipped.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use crate::course::{Course, SchoolDay};
use crate::error::{ImportError, ValidationError};
use crate::intervals;

/// Outcome of a successful import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub courses: Vec<Course>,
    /// Entries dropped because they could not be read.
    pub skipped: usize,
    /// Highest period any imported course uses.
    pub max_period: Option<u32>,
}

impl ImportReport {
    /// `max_period`, or `default` when nothing was imported.
    pub fn max_period_or(&self, default: u32) -> u32 {
        self.max_period.unwrap_or(default)
    }
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    name: String,
    #[serde(rename = "type", default)]
    kind: Value,
    #[serde(default)]
    teacher: Value,
    #[serde(default)]
    classroom: Value,
    weeks: Vec<Value>,
    time: Vec<Value>,
}

#[derive(Debug, Error)]
enum EntryError {
    #[error("malformed entry: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("course '{0}' has no readable weeks")]
    NoWeeks(String),
    #[error("course '{0}' has no readable periods")]
    NoPeriods(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Read and parse a timetable file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a JSON object.
pub fn import_file(path: impl AsRef<Path>) -> Result<ImportReport, ImportError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_timetable(&text)
}

/// Parse a timetable document.
///
/// # Errors
/// Returns an error if `json` is not valid JSON or its top level is not an
/// object.
pub fn parse_timetable(json: &str) -> Result<ImportReport, ImportError> {
    let root: Value = serde_json::from_str(json)?;
    let Some(days) = root.as_object() else {
        return Err(ImportError::NotAnObject {
            found: json_kind(&root),
        });
    };

    let mut courses = Vec::new();
    let mut skipped = 0;

    for day in SchoolDay::ALL {
        let entries = match days.get(day.key()) {
            None | Some(Value::Null) => continue,
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                tracing::warn!(day = day.key(), found = json_kind(other), "day is not an array, ignoring");
                continue;
            }
        };
        tracing::debug!(day = day.key(), entries = entries.len(), "reading day");

        for (index, entry) in entries.iter().enumerate() {
            match parse_entry(day, entry) {
                Ok(course) => courses.push(course),
                Err(e) => {
                    tracing::warn!(day = day.key(), index, error = %e, "skipping course entry");
                    skipped += 1;
                }
            }
        }
    }

    let max_period = courses.iter().map(Course::last_period).max();
    tracing::info!(imported = courses.len(), skipped, ?max_period, "parsed timetable");

    Ok(ImportReport {
        courses,
        skipped,
        max_period,
    })
}

fn parse_entry(day: SchoolDay, entry: &Value) -> Result<Course, EntryError> {
    let raw = RawEntry::deserialize(entry)?;

    let weeks: Vec<u32> = raw.weeks.iter().flat_map(week_item).collect();
    if weeks.is_empty() {
        return Err(EntryError::NoWeeks(raw.name));
    }
    let periods: Vec<u32> = raw.time.iter().filter_map(period_item).collect();
    if periods.is_empty() {
        return Err(EntryError::NoPeriods(raw.name));
    }

    Ok(Course::new(
        raw.name,
        text_field(&raw.kind),
        text_field(&raw.teacher),
        text_field(&raw.classroom),
        day,
        periods,
        weeks,
    )?)
}

/// Weeks may be given as numbers or as codec strings (`"1-8"`, `"3,5"`).
fn week_item(item: &Value) -> Vec<u32> {
    match item {
        Value::String(s) => intervals::decode(s),
        Value::Number(_) => period_item(item).into_iter().collect(),
        other => {
            tracing::warn!(item = %other, "skipping week item");
            Vec::new()
        }
    }
}

fn period_item(item: &Value) -> Option<u32> {
    let value = match item {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    match value {
        Some(n) if (1..=intervals::MAX_VALUE).contains(&n) => Some(n),
        _ => {
            tracing::warn!(item = %item, "skipping period item");
            None
        }
    }
}

fn text_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "monday": [
            { "name": "Calculus", "type": "Lecture", "teacher": "Dr. Lin",
              "classroom": "A101", "weeks": ["1-8", "10"], "time": [2, 1] },
            { "name": "Broken", "weeks": ["1"] }
        ],
        "wednesday": [
            { "name": "Physics Lab", "weeks": [3, "5-6"], "time": [5, "6"] }
        ],
        "saturday": [
            { "name": "Ignored", "weeks": ["1"], "time": [1] }
        ]
    }"#;

    #[test]
    fn imports_valid_entries_and_skips_broken() {
        let report = parse_timetable(SAMPLE).unwrap();
        assert_eq!(report.courses.len(), 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.max_period, Some(6));

        let calculus = &report.courses[0];
        assert_eq!(calculus.day, SchoolDay::Monday);
        assert_eq!(calculus.kind, "Lecture");
        assert_eq!(calculus.location, "A101");
        assert_eq!(calculus.periods(), &[1, 2]);
        assert_eq!(calculus.weeks(), &[1, 2, 3, 4, 5, 6, 7, 8, 10]);

        let lab = &report.courses[1];
        assert_eq!(lab.day, SchoolDay::Wednesday);
        assert_eq!(lab.teacher, "");
        assert_eq!(lab.weeks(), &[3, 5, 6]);
        assert_eq!(lab.periods(), &[5, 6]);
    }

    #[test]
    fn entry_with_only_invalid_weeks_is_skipped() {
        let json = r#"{ "friday": [ { "name": "Art", "weeks": ["abc"], "time": [1] } ] }"#;
        let report = parse_timetable(json).unwrap();
        assert!(report.courses.is_empty());
        assert_eq!(report.skipped, 1);
        assert_eq!(report.max_period_or(12), 12);
    }

    #[test]
    fn invalid_period_items_are_dropped() {
        let json = r#"{ "tuesday": [ { "name": "Art", "weeks": ["1"], "time": [0, -1, "x", 3] } ] }"#;
        let report = parse_timetable(json).unwrap();
        assert_eq!(report.courses[0].periods(), &[3]);
    }

    #[test]
    fn values_past_the_bound_are_skipped() {
        let json = r#"{ "monday": [
            { "name": "Late", "weeks": [1000], "time": [1] },
            { "name": "Later", "weeks": ["1"], "time": [1000] },
            { "name": "Edge", "weeks": [999, "1000"], "time": [999, 1000] }
        ] }"#;
        let report = parse_timetable(json).unwrap();
        assert_eq!(report.skipped, 2);
        assert_eq!(report.courses.len(), 1);
        assert_eq!(report.courses[0].weeks(), &[999]);
        assert_eq!(report.courses[0].periods(), &[999]);
    }

    #[test]
    fn non_json_fails_whole_import() {
        assert!(matches!(parse_timetable("not json"), Err(ImportError::Json(_))));
    }

    #[test]
    fn non_object_fails_whole_import() {
        let err = parse_timetable("[1, 2]").unwrap_err();
        assert!(matches!(err, ImportError::NotAnObject { found: "an array" }));
    }

    #[test]
    fn missing_days_are_empty() {
        let report = parse_timetable("{}").unwrap();
        assert!(report.courses.is_empty());
        assert_eq!(report.skipped, 0);
        assert_eq!(report.max_period, None);
    }
}
