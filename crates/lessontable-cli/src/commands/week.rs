use clap::Args;
use lessontable_core::{term, Config, LessonDb, SchoolDay, TermCalendar};
use serde_json::json;

#[derive(Args)]
pub struct WeekArgs {
    /// Date to evaluate instead of today (YYYY-M-D)
    #[arg(long)]
    today: Option<String>,
}

pub fn run(args: WeekArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let today = super::today_or(args.today.as_deref())?;
    let db = LessonDb::open()?;
    let start = db
        .first_week_date()?
        .ok_or("term start date is not set; run `lessontable settings start-date YYYY-M-D`")?;

    let calendar = TermCalendar::new(start, config.term.max_week);
    let current = calendar.current_week(today);
    let days: Vec<_> = SchoolDay::ALL
        .iter()
        .zip(calendar.week_dates(current.week))
        .map(|(day, date)| json!({ "day": day, "date": term::format_date(date) }))
        .collect();

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "week": current.week,
            "status": current.status,
            "max_week": calendar.max_week,
            "first_week_date": term::format_date(start),
            "days": days,
        }))?
    );
    Ok(())
}
