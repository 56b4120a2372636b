//! Academic term calendar: which teaching week a date falls in, the dates of
//! a week, and week-by-week paging.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::course::{SchoolDay, DAYS_PER_WEEK};
use crate::error::ValidationError;

/// Number of teaching weeks when the configuration does not say otherwise.
pub const DEFAULT_MAX_WEEK: u32 = 20;

/// Where a date sits relative to the term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermStatus {
    InTerm,
    BeforeTerm,
    AfterTerm,
}

/// Result of the current-week calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentWeek {
    /// Week to display, always within `1..=max_week`.
    pub week: u32,
    pub status: TermStatus,
}

impl CurrentWeek {
    pub fn in_term(&self) -> bool {
        self.status == TermStatus::InTerm
    }
}

/// A term defined by the date its first week starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCalendar {
    pub start: NaiveDate,
    pub max_week: u32,
}

impl TermCalendar {
    pub fn new(start: NaiveDate, max_week: u32) -> Self {
        Self {
            start,
            max_week: max_week.max(1),
        }
    }

    /// Teaching week for `today`.
    ///
    /// Dates before the start, and dates past the last week, both report
    /// week 1 together with the matching status.
    pub fn current_week(&self, today: NaiveDate) -> CurrentWeek {
        let days = (today - self.start).num_days();
        if days < 0 {
            return CurrentWeek {
                week: 1,
                status: TermStatus::BeforeTerm,
            };
        }

        let week = days / 7 + 1;
        if week > i64::from(self.max_week) {
            return CurrentWeek {
                week: 1,
                status: TermStatus::AfterTerm,
            };
        }

        CurrentWeek {
            week: week as u32,
            status: TermStatus::InTerm,
        }
    }

    /// Monday of teaching week `week`.
    ///
    /// The start date is shifted by whole weeks and then moved back to that
    /// week's Monday, so a term starting mid-week still has Monday columns.
    pub fn monday_of(&self, week: u32) -> NaiveDate {
        let shifted = self.start + Duration::weeks(i64::from(week.max(1)) - 1);
        shifted - Duration::days(i64::from(shifted.weekday().num_days_from_monday()))
    }

    /// Dates of Monday..Friday in teaching week `week`.
    pub fn week_dates(&self, week: u32) -> [NaiveDate; DAYS_PER_WEEK] {
        let monday = self.monday_of(week);
        SchoolDay::ALL.map(|day| monday + Duration::days(day.index() as i64))
    }

    /// Date a school day falls on in teaching week `week`.
    pub fn date_of(&self, week: u32, day: SchoolDay) -> NaiveDate {
        self.week_dates(week)[day.index()]
    }
}

/// Parse a term start date. Accepts `2024-9-2` as well as `2024-09-02`.
pub fn parse_date(text: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|e| ValidationError::InvalidValue {
        field: "first_week_date".into(),
        message: format!("'{text}' is not a date: {e}"),
    })
}

/// Format a term start date the way it is stored, without zero padding.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%-m-%-d").to_string()
}

/// Week selection that moves one week at a time within `1..=max_week`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekPager {
    current: u32,
    max_week: u32,
}

impl WeekPager {
    pub fn new(current: u32, max_week: u32) -> Self {
        let max_week = max_week.max(1);
        Self {
            current: current.clamp(1, max_week),
            max_week,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max_week(&self) -> u32 {
        self.max_week
    }

    /// Advance one week. Returns `false` when already on the last week.
    pub fn next(&mut self) -> bool {
        if self.current < self.max_week {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Go back one week. Returns `false` when already on week 1.
    pub fn previous(&mut self) -> bool {
        if self.current > 1 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `week`, clamped into range.
    pub fn go_to(&mut self, week: u32) -> u32 {
        self.current = week.clamp(1, self.max_week);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn term() -> TermCalendar {
        TermCalendar::new(date(2024, 9, 2), DEFAULT_MAX_WEEK)
    }

    #[test]
    fn first_day_is_week_one() {
        let cw = term().current_week(date(2024, 9, 2));
        assert_eq!(cw, CurrentWeek { week: 1, status: TermStatus::InTerm });
        assert_eq!(term().current_week(date(2024, 9, 8)).week, 1);
        assert_eq!(term().current_week(date(2024, 9, 9)).week, 2);
    }

    #[test]
    fn two_weeks_later_is_week_three() {
        let cw = term().current_week(date(2024, 9, 16));
        assert_eq!(cw.week, 3);
        assert!(cw.in_term());
    }

    #[test]
    fn before_start_clamps_to_week_one() {
        let cw = term().current_week(date(2024, 8, 30));
        assert_eq!(cw, CurrentWeek { week: 1, status: TermStatus::BeforeTerm });
    }

    #[test]
    fn after_last_week_clamps_to_week_one() {
        // Day 140 is the first day of week 21
        let cw = term().current_week(date(2024, 9, 2) + Duration::days(140));
        assert_eq!(cw, CurrentWeek { week: 1, status: TermStatus::AfterTerm });

        let last = term().current_week(date(2024, 9, 2) + Duration::days(139));
        assert_eq!(last, CurrentWeek { week: 20, status: TermStatus::InTerm });
    }

    #[test]
    fn max_week_is_configurable() {
        let short = TermCalendar::new(date(2024, 9, 2), 2);
        assert_eq!(short.current_week(date(2024, 9, 16)).status, TermStatus::AfterTerm);
    }

    #[test]
    fn week_dates_start_on_monday() {
        // 2024-09-04 is a Wednesday
        let cal = TermCalendar::new(date(2024, 9, 4), 20);
        let dates = cal.week_dates(1);
        assert_eq!(dates[0], date(2024, 9, 2));
        assert_eq!(dates[4], date(2024, 9, 6));
        assert_eq!(cal.date_of(3, SchoolDay::Tuesday), date(2024, 9, 17));
    }

    #[test]
    fn parses_unpadded_and_padded_dates() {
        assert_eq!(parse_date("2024-9-2").unwrap(), date(2024, 9, 2));
        assert_eq!(parse_date("2024-09-02").unwrap(), date(2024, 9, 2));
        assert!(parse_date("next monday").is_err());
        assert_eq!(format_date(date(2024, 9, 2)), "2024-9-2");
    }

    #[test]
    fn pager_stays_in_range() {
        let mut pager = WeekPager::new(1, 3);
        assert!(!pager.previous());
        assert!(pager.next());
        assert!(pager.next());
        assert!(!pager.next());
        assert_eq!(pager.current(), 3);
        assert_eq!(pager.go_to(10), 3);
        assert_eq!(pager.go_to(0), 1);
        assert_eq!(WeekPager::new(99, 20).current(), 20);
    }
}
