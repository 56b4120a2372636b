//! Text and JSON rendering of one week's course grid.

use clap::Args;
use lessontable_core::storage::{data_dir, DB_FILE_NAME};
use lessontable_core::{
    intervals, load_snapshot, Config, Course, CurrentWeek, SchoolDay, Snapshot, TermStatus,
    WeekGrid, WeekPager, DAYS_PER_WEEK,
};
use serde::Serialize;

const COLUMN_WIDTH: usize = 14;

#[derive(Args)]
pub struct GridArgs {
    /// Week to show (defaults to the current week)
    #[arg(long)]
    week: Option<u32>,
    /// Date used to work out the current week (YYYY-M-D)
    #[arg(long)]
    today: Option<String>,
    /// Show the week after the selected one
    #[arg(long, conflicts_with = "prev")]
    next: bool,
    /// Show the week before the selected one
    #[arg(long)]
    prev: bool,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct CellView<'a> {
    day: SchoolDay,
    period: u32,
    span: usize,
    course: &'a Course,
    periods: &'a [u32],
}

#[derive(Serialize)]
struct GridView<'a> {
    week: u32,
    status: Option<TermStatus>,
    rows: usize,
    cells: Vec<CellView<'a>>,
}

pub fn run(args: GridArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let path = data_dir()?.join(DB_FILE_NAME);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let snapshot = runtime.block_on(load_snapshot(path, config.periods.default_max_periods));

    if snapshot.needs_import() {
        return Err("no timetable imported yet; run `lessontable import <file>`".into());
    }

    let today = super::today_or(args.today.as_deref())?;
    let current = snapshot
        .term(config.term.max_week)
        .map(|term| term.current_week(today));

    let mut pager = WeekPager::new(current.map_or(1, |c| c.week), config.term.max_week);
    if let Some(week) = args.week {
        pager.go_to(week);
    }
    if args.next {
        pager.next();
    } else if args.prev {
        pager.previous();
    }

    let grid = snapshot.grid(pager.current(), &config.grid_layout());
    let status = current.map(|c| c.status);

    if args.json {
        let view = GridView {
            week: grid.week(),
            status,
            rows: grid.rows(),
            cells: grid
                .visible_cells()
                .map(|cell| CellView {
                    day: cell.day,
                    period: cell.period,
                    span: cell.span,
                    course: cell.block.course,
                    periods: &cell.block.periods,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_table(&grid, &snapshot, config, current));
    }
    Ok(())
}

fn render_table(
    grid: &WeekGrid<'_>,
    snapshot: &Snapshot,
    config: &Config,
    current: Option<CurrentWeek>,
) -> String {
    let mut out = String::new();
    let term = snapshot.term(config.term.max_week);

    out.push_str(&format!("Week {}", grid.week()));
    match current.map(|c| c.status) {
        Some(TermStatus::BeforeTerm) => out.push_str(" (term has not started)"),
        Some(TermStatus::AfterTerm) => out.push_str(" (term is over)"),
        _ => {}
    }
    out.push('\n');

    let mut header = format!("{:>12} ", "");
    for day in SchoolDay::ALL {
        let label = match &term {
            Some(term) => {
                let date = term.date_of(grid.week(), day);
                format!("{} {}", day.short_name(), date.format("%-m-%-d"))
            }
            None => day.short_name().to_string(),
        };
        header.push_str(&format!("| {:<w$}", label, w = COLUMN_WIDTH));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for row in 0..grid.rows() {
        let period = row as u32 + 1;
        let label = match snapshot.time_settings.period(period) {
            Some(time) => format!("{:>2} {}", period, time.start_text()),
            None => format!("{:>2}", period),
        };
        let mut line = format!("{:>12} ", label);
        for col in 0..DAYS_PER_WEEK {
            let text = match grid.cell(row, col) {
                Some(cell) if cell.visible => truncate(&cell.block.course.name, COLUMN_WIDTH),
                Some(_) => "\u{2502}".to_string(),
                None => String::new(),
            };
            line.push_str(&format!("| {:<w$}", text, w = COLUMN_WIDTH));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    if !grid.is_empty() {
        out.push('\n');
    }
    for block in grid.blocks() {
        let course = block.course;
        out.push_str(&format!(
            "{} {:<7} {}",
            block.day(),
            intervals::encode(&block.periods),
            course.name
        ));
        for extra in [&course.location, &course.teacher] {
            if !extra.is_empty() {
                out.push_str(&format!(", {extra}"));
            }
        }
        out.push_str(&format!(" (weeks {})\n", intervals::encode(course.weeks())));
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('\u{2026}');
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lessontable_core::{GridLayout, PeriodTime, TimeSettings};

    fn snapshot() -> Snapshot {
        let start = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        let t = |h, m| chrono::NaiveTime::from_hms_opt(h, m, 0).unwrap();
        Snapshot {
            courses: vec![
                Course::new("Calculus", "", "Dr. Lin", "A101", SchoolDay::Monday, [1, 2], [1]).unwrap(),
                Course::new("Seminar", "", "", "", SchoolDay::Friday, [3], [1]).unwrap(),
            ],
            time_settings: TimeSettings::new(start, vec![PeriodTime::new(1, t(8, 0), t(8, 45))]),
            max_periods: 3,
        }
    }

    #[test]
    fn table_marks_block_start_and_continuation() {
        let snapshot = snapshot();
        let config = Config::default();
        let grid = snapshot.grid(1, &GridLayout::default());
        let table = render_table(&grid, &snapshot, &config, None);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "Week 1");
        assert!(lines[1].contains("Mon 9-2"));
        assert!(lines[1].contains("Fri 9-6"));
        assert!(lines[2].contains(" 1 08:00"));
        assert!(lines[2].contains("Calculus"));
        assert!(lines[3].contains('\u{2502}'));
        assert!(lines[4].ends_with("Seminar"));
        assert!(table.contains("Mon 1-2     Calculus, A101, Dr. Lin (weeks 1)"));
    }

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("Short", 14), "Short");
        assert_eq!(truncate("Introduction to Algorithms", 8), "Introdu\u{2026}");
    }
}
