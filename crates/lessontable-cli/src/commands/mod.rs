pub mod config;
pub mod courses;
pub mod grid;
pub mod import;
pub mod settings;
pub mod status;
pub mod week;

use chrono::{Local, NaiveDate};
use lessontable_core::term;

/// `--today` override, or the local date.
pub fn today_or(arg: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match arg {
        Some(text) => Ok(term::parse_date(text)?),
        None => Ok(Local::now().date_naive()),
    }
}
