use lessontable_core::{term, Config, LessonDb, Snapshot};
use serde_json::json;

pub fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = LessonDb::open()?;
    let snapshot = Snapshot::load(&db, config.periods.default_max_periods);

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "imported": !snapshot.needs_import(),
            "courses": snapshot.courses.len(),
            "max_periods": snapshot.max_periods,
            "first_week_date": snapshot.time_settings.first_week_date.map(term::format_date),
            "needs_import": snapshot.needs_import(),
        }))?
    );
    Ok(())
}
