//! Weekly course grid.
//!
//! A [`WeekGrid`] places the courses that run in one teaching week into a
//! `rows × 5` matrix: one column per weekday, one row per period. Adjacent
//! occurrences of the same course on a day are merged into a single
//! [`CourseBlock`] whose period set is the union of theirs.
//!
//! Every cell a block covers points at it, but only the first cell of each
//! contiguous run is *visible*; the rest are suppressed so a presenter can
//! draw one tall block over several rows.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::course::{Course, SchoolDay, DAYS_PER_WEEK};

/// Row count used when no course names a period.
pub const DEFAULT_ROWS: usize = 10;

/// How many rows a grid has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Fixed row count; derived from the courses when `None`.
    pub rows: Option<usize>,
    /// Row count when `rows` is `None` and no course has a period.
    pub default_rows: usize,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            rows: None,
            default_rows: DEFAULT_ROWS,
        }
    }
}

impl GridLayout {
    pub fn fixed(rows: usize) -> Self {
        Self {
            rows: Some(rows),
            ..Self::default()
        }
    }

    /// Resolve the row count for one week's courses.
    pub fn rows_for<'c>(&self, courses: impl IntoIterator<Item = &'c Course>) -> usize {
        self.rows.unwrap_or_else(|| {
            courses
                .into_iter()
                .map(|c| c.last_period() as usize)
                .max()
                .unwrap_or(self.default_rows)
        })
    }
}

/// A run of same-course occurrences merged into one placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseBlock<'a> {
    /// First occurrence of the run; stands in for the whole block.
    pub course: &'a Course,
    /// Union of the run's periods, sorted and distinct.
    pub periods: Vec<u32>,
}

impl<'a> CourseBlock<'a> {
    pub fn day(&self) -> SchoolDay {
        self.course.day
    }

    pub fn contains(&self, period: u32) -> bool {
        self.periods.binary_search(&period).is_ok()
    }

    /// Whether `period` opens a contiguous run of this block.
    pub fn starts_run_at(&self, period: u32) -> bool {
        self.contains(period) && (period == 1 || !self.contains(period - 1))
    }

    /// The block's periods split into contiguous runs.
    pub fn segments(&self) -> Vec<Vec<u32>> {
        let mut segments: Vec<Vec<u32>> = Vec::new();
        for &period in &self.periods {
            match segments.last_mut() {
                Some(last) if last.last().is_some_and(|p| p + 1 == period) => last.push(period),
                _ => segments.push(vec![period]),
            }
        }
        segments
    }
}

/// What a presenter needs to know about one occupied cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell<'g, 'a> {
    pub block: &'g CourseBlock<'a>,
    /// 1-based period of the cell's row.
    pub period: u32,
    pub day: SchoolDay,
    /// Whether this cell paints the block; `false` for the rest of a run.
    pub visible: bool,
    /// Rows the painted block covers; 0 for suppressed cells.
    pub span: usize,
}

/// Course placement for one teaching week.
#[derive(Debug, Clone)]
pub struct WeekGrid<'a> {
    week: u32,
    blocks: Vec<CourseBlock<'a>>,
    cells: Vec<[Option<usize>; DAYS_PER_WEEK]>,
}

impl<'a> WeekGrid<'a> {
    /// Lay out the courses that run in `week`.
    ///
    /// The row count comes from that week's courses only; an empty week
    /// gets the layout's default. Periods beyond the last row are dropped.
    pub fn build(courses: &'a [Course], week: u32, layout: &GridLayout) -> Self {
        let in_week: Vec<&'a Course> = courses.iter().filter(|c| c.runs_in_week(week)).collect();
        let rows = layout.rows_for(in_week.iter().copied());
        let mut grid = Self {
            week,
            blocks: Vec::new(),
            cells: vec![[None; DAYS_PER_WEEK]; rows],
        };

        let mut by_day: [Vec<&'a Course>; DAYS_PER_WEEK] = Default::default();
        for course in in_week {
            by_day[course.day.index()].push(course);
        }

        for day_courses in &mut by_day {
            day_courses.sort_by_key(|c| c.first_period());
            for block in merge_runs(day_courses) {
                grid.place(block);
            }
        }

        tracing::debug!(
            week,
            rows,
            blocks = grid.blocks.len(),
            "built week grid"
        );
        grid
    }

    fn place(&mut self, block: CourseBlock<'a>) {
        let id = self.blocks.len();
        let col = block.day().index();
        for &period in &block.periods {
            let Some(row) = (period as usize).checked_sub(1) else {
                continue;
            };
            if let Some(cells) = self.cells.get_mut(row) {
                cells[col] = Some(id);
            }
        }
        self.blocks.push(block);
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn blocks(&self) -> &[CourseBlock<'a>] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The block occupying `(row, col)`, both 0-based.
    pub fn block_at(&self, row: usize, col: usize) -> Option<&CourseBlock<'a>> {
        let id = (*self.cells.get(row)?.get(col)?)?;
        self.blocks.get(id)
    }

    /// Full description of the cell at `(row, col)`, `None` when empty.
    ///
    /// The span stops at the last row and at the first cell the block does
    /// not own, so a later overlapping block shortens it.
    pub fn cell(&self, row: usize, col: usize) -> Option<GridCell<'_, 'a>> {
        let id = (*self.cells.get(row)?.get(col)?)?;
        let block = self.blocks.get(id)?;
        let period = row as u32 + 1;
        let visible = block.starts_run_at(period);
        let span = if visible {
            self.cells[row..]
                .iter()
                .take_while(|cells| cells[col] == Some(id))
                .count()
        } else {
            0
        };
        Some(GridCell {
            block,
            period,
            day: SchoolDay::ALL[col],
            visible,
            span,
        })
    }

    /// Cells that paint a block, row-major.
    pub fn visible_cells(&self) -> impl Iterator<Item = GridCell<'_, 'a>> + '_ {
        (0..self.rows())
            .flat_map(move |row| (0..DAYS_PER_WEEK).map(move |col| (row, col)))
            .filter_map(|(row, col)| self.cell(row, col))
            .filter(|cell| cell.visible)
    }
}

/// Merge consecutive equal-key courses of one day.
///
/// Period contiguity is not checked: two occurrences of the same course
/// merge even if another slot separates them.
fn merge_runs<'a>(sorted: &[&'a Course]) -> Vec<CourseBlock<'a>> {
    let mut blocks = Vec::new();
    let mut iter = sorted.iter().copied().peekable();

    while let Some(first) = iter.next() {
        let mut periods: BTreeSet<u32> = first.periods().iter().copied().collect();
        while let Some(next) = iter.next_if(|c| c.is_same_course(first)) {
            periods.extend(next.periods().iter().copied());
        }
        blocks.push(CourseBlock {
            course: first,
            periods: periods.into_iter().collect(),
        });
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(name: &str, day: SchoolDay, periods: &[u32], weeks: &[u32]) -> Course {
        Course::new(
            name,
            "",
            "Dr. Lin",
            "A101",
            day,
            periods.to_vec(),
            weeks.to_vec(),
        )
        .unwrap()
    }

    #[test]
    fn empty_course_list_gives_default_rows() {
        let grid = WeekGrid::build(&[], 1, &GridLayout::default());
        assert_eq!(grid.rows(), DEFAULT_ROWS);
        assert!(grid.is_empty());
        assert_eq!(grid.visible_cells().count(), 0);
    }

    #[test]
    fn rows_follow_largest_period_of_the_week() {
        let courses = vec![
            course("Math", SchoolDay::Monday, &[1, 2], &[1]),
            course("Art", SchoolDay::Friday, &[7, 8], &[2]),
        ];
        let grid = WeekGrid::build(&courses, 1, &GridLayout::default());
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.blocks().len(), 1);

        let grid = WeekGrid::build(&courses, 2, &GridLayout::default());
        assert_eq!(grid.rows(), 8);
    }

    #[test]
    fn week_without_courses_gets_default_rows() {
        let courses = vec![course("Art", SchoolDay::Friday, &[11, 12], &[2])];
        let grid = WeekGrid::build(&courses, 1, &GridLayout::default());
        assert_eq!(grid.rows(), DEFAULT_ROWS);
        assert!(grid.is_empty());
    }

    #[test]
    fn places_course_only_in_its_cells() {
        let courses = vec![course("Math", SchoolDay::Wednesday, &[3, 4], &[1, 2])];
        let grid = WeekGrid::build(&courses, 2, &GridLayout::default());
        for row in 0..grid.rows() {
            for col in 0..DAYS_PER_WEEK {
                let expected = col == 2 && (row == 2 || row == 3);
                assert_eq!(grid.block_at(row, col).is_some(), expected, "({row}, {col})");
            }
        }
    }

    #[test]
    fn course_outside_week_contributes_nothing() {
        let courses = vec![course("Math", SchoolDay::Monday, &[1, 2], &[1, 3])];
        let grid = WeekGrid::build(&courses, 2, &GridLayout::default());
        assert!(grid.is_empty());
        assert!(grid.block_at(0, 0).is_none());
    }

    #[test]
    fn split_occurrences_merge_into_one_visible_block() {
        let courses = vec![
            course("Math", SchoolDay::Monday, &[3, 4], &[1]),
            course("Math", SchoolDay::Monday, &[1, 2], &[1]),
        ];
        let grid = WeekGrid::build(&courses, 1, &GridLayout::default());
        assert_eq!(grid.blocks().len(), 1);
        assert_eq!(grid.blocks()[0].periods, vec![1, 2, 3, 4]);

        let visible: Vec<_> = grid.visible_cells().collect();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].period, 1);
        assert_eq!(visible[0].span, 4);

        for row in 1..4 {
            let cell = grid.cell(row, 0).unwrap();
            assert!(!cell.visible);
            assert_eq!(cell.span, 0);
        }
    }

    #[test]
    fn different_courses_do_not_merge() {
        let courses = vec![
            course("Math", SchoolDay::Monday, &[1, 2], &[1]),
            course("Physics", SchoolDay::Monday, &[3, 4], &[1]),
        ];
        let grid = WeekGrid::build(&courses, 1, &GridLayout::default());
        assert_eq!(grid.blocks().len(), 2);
        let visible: Vec<_> = grid.visible_cells().map(|c| c.period).collect();
        assert_eq!(visible, vec![1, 3]);
    }

    #[test]
    fn same_course_merges_across_a_gap() {
        let courses = vec![
            course("Math", SchoolDay::Tuesday, &[1, 2], &[1]),
            course("Math", SchoolDay::Tuesday, &[5, 6], &[1]),
        ];
        let grid = WeekGrid::build(&courses, 1, &GridLayout::default());
        assert_eq!(grid.blocks().len(), 1);
        let block = &grid.blocks()[0];
        assert_eq!(block.segments(), vec![vec![1, 2], vec![5, 6]]);

        let visible: Vec<_> = grid.visible_cells().map(|c| (c.period, c.span)).collect();
        assert_eq!(visible, vec![(1, 2), (5, 2)]);
    }

    #[test]
    fn interleaved_course_splits_runs() {
        let courses = vec![
            course("Math", SchoolDay::Monday, &[1], &[1]),
            course("Physics", SchoolDay::Monday, &[2], &[1]),
            course("Math", SchoolDay::Monday, &[3], &[1]),
        ];
        let grid = WeekGrid::build(&courses, 1, &GridLayout::default());
        assert_eq!(grid.blocks().len(), 3);
    }

    #[test]
    fn fixed_layout_drops_out_of_range_periods() {
        let courses = vec![course("Math", SchoolDay::Friday, &[4, 5, 6], &[1])];
        let grid = WeekGrid::build(&courses, 1, &GridLayout::fixed(5));
        assert_eq!(grid.rows(), 5);
        assert!(grid.block_at(3, 4).is_some());
        assert!(grid.block_at(4, 4).is_some());
        assert!(grid.block_at(5, 4).is_none());

        let cell = grid.cell(3, 4).unwrap();
        assert!(cell.visible);
        assert_eq!(cell.span, 2, "span stops at the last row");
    }

    #[test]
    fn later_block_overwrites_shared_cell() {
        let courses = vec![
            course("Math", SchoolDay::Monday, &[1, 2], &[1]),
            course("Physics", SchoolDay::Monday, &[2, 3], &[1]),
        ];
        let grid = WeekGrid::build(&courses, 1, &GridLayout::default());
        assert_eq!(grid.block_at(1, 0).unwrap().course.name, "Physics");

        let visible: Vec<_> = grid
            .visible_cells()
            .map(|c| (c.block.course.name.as_str(), c.period, c.span))
            .collect();
        assert_eq!(visible, vec![("Math", 1, 1), ("Physics", 2, 2)]);
    }

    #[test]
    fn span_counts_contiguous_periods() {
        let courses = vec![course("Math", SchoolDay::Monday, &[2, 3, 4, 7], &[1])];
        let grid = WeekGrid::build(&courses, 1, &GridLayout::default());
        let span = |row| grid.cell(row, 0).map(|c| c.span);
        assert_eq!(span(0), None);
        assert_eq!(span(1), Some(3));
        assert_eq!(span(2), Some(0));
        assert_eq!(span(6), Some(1));
    }
}
