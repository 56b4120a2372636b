use clap::Args;
use lessontable_core::{import_file, Config, LessonDb};
use serde_json::json;
use std::path::PathBuf;

#[derive(Args)]
pub struct ImportArgs {
    /// Path to the timetable JSON file
    path: PathBuf,
}

pub fn run(args: ImportArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!(path = %args.path.display(), "importing timetable");
    // Parse before opening the database so a bad file leaves stored data alone
    let report = import_file(&args.path)?;
    let max_periods = report.max_period_or(config.periods.default_max_periods);

    let db = LessonDb::open()?;
    let inserted = db.replace_courses(&report.courses, Some(max_periods))?;

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "imported": inserted,
            "skipped": report.skipped,
            "max_periods": max_periods,
        }))?
    );
    eprintln!("next: set the term start date with `lessontable settings start-date YYYY-M-D`");
    Ok(())
}
