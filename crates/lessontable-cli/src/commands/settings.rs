//! Term start date and per-period clock times.

use clap::Subcommand;
use lessontable_core::period_times::{self, PeriodTime};
use lessontable_core::{term, Config, LessonDb, ValidationError};
use serde_json::json;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show the term start date and period times
    Show,
    /// Set the date teaching week 1 starts (YYYY-M-D)
    StartDate {
        date: String,
    },
    /// Set the clock times of one period
    Period {
        /// 1-based period number
        number: u32,
        /// Start time (HH:MM)
        start: String,
        /// End time (HH:MM); defaults to the configured period length
        #[arg(long)]
        end: Option<String>,
    },
    /// Set how many periods a day has
    MaxPeriods {
        n: u32,
    },
}

pub fn run(action: SettingsAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = LessonDb::open()?;
    let default_max = config.periods.default_max_periods;

    match action {
        SettingsAction::Show => {
            let settings = db.time_settings()?;
            let max_periods = db.max_periods(default_max)?;
            let complete = settings.validate(max_periods);
            let periods: Vec<_> = settings
                .periods
                .iter()
                .map(|p| json!({ "period": p.period, "start": p.start_text(), "end": p.end_text() }))
                .collect();

            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "first_week_date": settings.first_week_date.map(term::format_date),
                    "max_periods": max_periods,
                    "periods": periods,
                    "complete": complete.is_ok(),
                    "problem": complete.err().map(|e| e.to_string()),
                }))?
            );
        }
        SettingsAction::StartDate { date } => {
            let date = term::parse_date(&date)?;
            db.set_first_week_date(date)?;
            println!("first week starts {}", term::format_date(date));
        }
        SettingsAction::Period { number, start, end } => {
            if number == 0 {
                return Err(ValidationError::InvalidValue {
                    field: "period".into(),
                    message: "periods are numbered from 1".into(),
                }
                .into());
            }
            let start = period_times::parse_clock(&start)?;
            let time = match end {
                Some(end) => PeriodTime::new(number, start, period_times::parse_clock(&end)?),
                None => PeriodTime::starting_at(number, start, config.periods.default_length_minutes),
            };

            let mut settings = db.time_settings()?;
            if settings.first_week_date.is_none() {
                return Err("set the term start date before period times".into());
            }
            settings.set_period(time);
            let max_periods = db.max_periods(default_max)?.max(number);
            db.save_time_settings(&settings, max_periods)?;
            println!("period {} {}-{}", number, time.start_text(), time.end_text());
        }
        SettingsAction::MaxPeriods { n } => {
            if n == 0 {
                return Err(ValidationError::InvalidValue {
                    field: "max_periods".into(),
                    message: "must be at least 1".into(),
                }
                .into());
            }
            db.set_max_periods(n)?;
            println!("max periods {n}");
        }
    }
    Ok(())
}
