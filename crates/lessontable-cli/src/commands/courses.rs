use clap::Args;
use lessontable_core::{Course, LessonDb, SchoolDay};

#[derive(Args)]
pub struct CoursesArgs {
    /// Only courses that run in this week
    #[arg(long)]
    week: Option<u32>,
    /// Only courses on this day (1 = Monday .. 5 = Friday)
    #[arg(long)]
    day: Option<i64>,
}

pub fn run(args: CoursesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let day = args.day.map(SchoolDay::from_number).transpose()?;
    let db = LessonDb::open()?;

    let courses: Vec<Course> = db
        .list_courses()?
        .into_iter()
        .filter(|c| args.week.map_or(true, |w| c.runs_in_week(w)))
        .filter(|c| day.map_or(true, |d| c.day == d))
        .collect();

    println!("{}", serde_json::to_string_pretty(&courses)?);
    Ok(())
}
