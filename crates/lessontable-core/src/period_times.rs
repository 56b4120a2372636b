//! Clock times of each teaching period and the term start date.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Length of a period when only its start time is given.
pub const DEFAULT_PERIOD_MINUTES: u32 = 110;

const CLOCK_FORMAT: &str = "%H:%M";

/// Start and end time of one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTime {
    /// 1-based period number.
    pub period: u32,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl PeriodTime {
    pub fn new(period: u32, start: NaiveTime, end: NaiveTime) -> Self {
        Self { period, start, end }
    }

    /// A period whose end is `length_minutes` after its start.
    pub fn starting_at(period: u32, start: NaiveTime, length_minutes: u32) -> Self {
        Self::new(period, start, default_end(start, length_minutes))
    }

    pub fn start_text(&self) -> String {
        format_clock(self.start)
    }

    pub fn end_text(&self) -> String {
        format_clock(self.end)
    }
}

/// End time `length_minutes` after `start`, wrapping past midnight.
pub fn default_end(start: NaiveTime, length_minutes: u32) -> NaiveTime {
    let (end, _) = start.overflowing_add_signed(Duration::minutes(i64::from(length_minutes)));
    end
}

/// Parse `HH:MM`.
pub fn parse_clock(text: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(text.trim(), CLOCK_FORMAT).map_err(|e| {
        ValidationError::InvalidValue {
            field: "time".into(),
            message: format!("'{text}' is not an HH:MM time: {e}"),
        }
    })
}

pub fn format_clock(time: NaiveTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

/// Period clock times plus the date teaching week 1 starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TimeSettings {
    pub first_week_date: Option<NaiveDate>,
    pub periods: Vec<PeriodTime>,
}

impl TimeSettings {
    pub fn new(first_week_date: NaiveDate, periods: Vec<PeriodTime>) -> Self {
        let mut settings = Self {
            first_week_date: Some(first_week_date),
            periods: Vec::new(),
        };
        for period in periods {
            settings.set_period(period);
        }
        settings
    }

    pub fn period(&self, period: u32) -> Option<&PeriodTime> {
        self.periods.iter().find(|p| p.period == period)
    }

    /// Insert or replace one period, keeping the list ordered.
    pub fn set_period(&mut self, time: PeriodTime) {
        match self.periods.binary_search_by_key(&time.period, |p| p.period) {
            Ok(i) => self.periods[i] = time,
            Err(i) => self.periods.insert(i, time),
        }
    }

    /// Check that the settings are complete for a timetable of
    /// `max_periods` periods.
    ///
    /// # Errors
    /// Returns the first missing piece: the start date, then the lowest
    /// period without times.
    pub fn validate(&self, max_periods: u32) -> Result<(), ValidationError> {
        if self.first_week_date.is_none() {
            return Err(ValidationError::InvalidValue {
                field: "first_week_date".into(),
                message: "term start date is not set".into(),
            });
        }
        match (1..=max_periods).find(|&n| self.period(n).is_none()) {
            Some(missing) => Err(ValidationError::MissingPeriod(missing)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn default_end_adds_length() {
        assert_eq!(default_end(t(8, 0), DEFAULT_PERIOD_MINUTES), t(9, 50));
        assert_eq!(default_end(t(8, 30), 45), t(9, 15));
    }

    #[test]
    fn default_end_wraps_midnight() {
        assert_eq!(default_end(t(23, 30), DEFAULT_PERIOD_MINUTES), t(1, 20));
    }

    #[test]
    fn clock_text_roundtrip() {
        assert_eq!(parse_clock("08:05").unwrap(), t(8, 5));
        assert_eq!(parse_clock(" 14:00 ").unwrap(), t(14, 0));
        assert!(parse_clock("25:00").is_err());
        assert!(parse_clock("noon").is_err());
        let p = PeriodTime::starting_at(1, t(8, 0), 45);
        assert_eq!(p.start_text(), "08:00");
        assert_eq!(p.end_text(), "08:45");
    }

    #[test]
    fn set_period_keeps_order_and_replaces() {
        let mut settings = TimeSettings::default();
        settings.set_period(PeriodTime::new(2, t(10, 0), t(10, 45)));
        settings.set_period(PeriodTime::new(1, t(8, 0), t(8, 45)));
        settings.set_period(PeriodTime::new(2, t(10, 10), t(10, 55)));
        let numbers: Vec<u32> = settings.periods.iter().map(|p| p.period).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(settings.period(2).unwrap().start, t(10, 10));
    }

    #[test]
    fn validate_reports_first_gap() {
        let start = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        let settings = TimeSettings::new(
            start,
            vec![
                PeriodTime::new(1, t(8, 0), t(8, 45)),
                PeriodTime::new(3, t(10, 0), t(10, 45)),
            ],
        );
        assert_eq!(settings.validate(1), Ok(()));
        assert_eq!(settings.validate(3), Err(ValidationError::MissingPeriod(2)));

        let undated = TimeSettings::default();
        assert!(matches!(
            undated.validate(0),
            Err(ValidationError::InvalidValue { .. })
        ));
    }
}
