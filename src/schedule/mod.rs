//! Visit schedule extraction from a normalized sheet grid.
//!
//! Sheet layout:
//!   A1  candidate name (title)
//!   C1  visit date
//!   a row whose first cell is `Time` marks the header; every row after it
//!   is `time range | person | room | notes`.
//!
//! Missing structure is reported as warnings on the returned [`Schedule`],
//! never as an error, so a batch of schedules can still be aggregated.

pub mod time;

use chrono::{Datelike, Local, NaiveDate, Weekday};
use serde::Serialize;

use crate::table::CellGrid;

/// First-cell value of the header row.
pub const HEADER_SENTINEL: &str = "Time";
/// Person cell marking a break rather than a meeting.
pub const BREAK: &str = "BREAK";
/// Time cell used for the morning hotel pickup.
pub const PICKUP_BREAKFAST: &str = "Pickup/Breakfast";
/// Range substituted for [`PICKUP_BREAKFAST`].
pub const PICKUP_BREAKFAST_RANGE: &str = "8:00-9:00";
/// Marker in the time cell for lunch slots.
pub const LUNCH: &str = "LUNCH";
/// Marker in the time cell for dinner; an exact match means "time is in the notes".
pub const DINNER: &str = "DINNER";

pub const WARN_NO_DATE: &str = "could not find date";
pub const WARN_NO_HEADER: &str = "could not find header row";

const TITLE_CELL: (usize, usize) = (0, 0);
const DATE_CELL: (usize, usize) = (0, 2);

/// One body row of a schedule sheet, columns by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    pub time_range: String,
    pub person: String,
    pub room: String,
    pub notes: String,
}

impl ScheduleRow {
    fn from_cells(cells: &[String]) -> Self {
        let col = |i: usize| cells.get(i).cloned().unwrap_or_default();
        Self {
            time_range: col(0),
            person: col(1),
            room: col(2),
            notes: col(3),
        }
    }
}

/// A candidate's parsed visit day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub title: String,
    /// `None` when the date cell is empty or unreadable; `rows` is then empty.
    pub date: Option<NaiveDate>,
    pub rows: Vec<ScheduleRow>,
    pub warnings: Vec<String>,
}

impl Schedule {
    fn without_rows(title: String, date: Option<NaiveDate>, warning: String) -> Self {
        log::warn!("schedule {:?}: {}", title, warning);
        Self {
            title,
            date,
            rows: Vec::new(),
            warnings: vec![warning],
        }
    }
}

/// Extract a [`Schedule`] from a grid, filling a missing year with the current one.
pub fn extract_schedule(grid: &CellGrid) -> Schedule {
    extract_schedule_in_year(grid, Local::now().year())
}

/// Same as [`extract_schedule`] with an explicit fallback year.
pub fn extract_schedule_in_year(grid: &CellGrid, fallback_year: i32) -> Schedule {
    let title = grid.cell(TITLE_CELL.0, TITLE_CELL.1).to_string();
    let date_text = grid.cell(DATE_CELL.0, DATE_CELL.1).trim();

    if date_text.is_empty() {
        return Schedule::without_rows(title, None, WARN_NO_DATE.to_string());
    }
    let Some(date) = parse_sheet_date(date_text, fallback_year) else {
        return Schedule::without_rows(title, None, format!("could not parse date: {}", date_text));
    };

    let header = grid
        .rows()
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, row)| row.first().map(String::as_str) == Some(HEADER_SENTINEL))
        .map(|(i, _)| i);
    let Some(header) = header else {
        return Schedule::without_rows(title, Some(date), WARN_NO_HEADER.to_string());
    };

    let rows = grid.rows()[header + 1..]
        .iter()
        .map(|cells| ScheduleRow::from_cells(cells))
        .collect();

    Schedule {
        title,
        date: Some(date),
        rows,
        warnings: Vec::new(),
    }
}

/// Formats that carry their own year.
/// `%y` is tried before `%Y` so `4/1/24` is not read as the year 24.
const DATED_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y", "%B %d, %Y", "%B %d %Y"];

/// Formats without a year; the fallback year is appended as ` %Y`.
const YEARLESS_FORMATS: &[&str] = &["%m/%d %Y", "%B %d %Y"];

/// Parse the date cell. A leading weekday (`"Monday, "`) is dropped so that a
/// yearless date is not rejected for naming the wrong weekday in the
/// fallback year.
pub fn parse_sheet_date(text: &str, fallback_year: i32) -> Option<NaiveDate> {
    let text = strip_weekday(text.trim());

    for fmt in DATED_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date);
        }
    }

    let with_year = format!("{} {}", text.trim_end_matches(','), fallback_year);
    YEARLESS_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&with_year, fmt).ok())
}

fn strip_weekday(text: &str) -> &str {
    match text.split_once(',') {
        Some((head, rest)) if head.trim().parse::<Weekday>().is_ok() => rest.trim_start(),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::parse_tsv;

    fn grid(rows: &[&[&str]]) -> CellGrid {
        CellGrid::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_extracts_title_date_and_rows() {
        let g = grid(&[
            &["Alan Turing", "", "2024-04-01", ""],
            &["", "", "", ""],
            &["Host: Alonzo Church", "", "", ""],
            &["Time", "", "", ""],
            &["8:00-9:00", "Alonzo Church", "Room A", ""],
        ]);
        let sched = extract_schedule_in_year(&g, 2026);
        assert_eq!(sched.title, "Alan Turing");
        assert_eq!(sched.date, NaiveDate::from_ymd_opt(2024, 4, 1));
        assert!(sched.warnings.is_empty());
        assert_eq!(
            sched.rows,
            vec![ScheduleRow {
                time_range: "8:00-9:00".into(),
                person: "Alonzo Church".into(),
                room: "Room A".into(),
                notes: String::new(),
            }]
        );
    }

    #[test]
    fn test_missing_date_is_a_warning() {
        let g = grid(&[
            &["Alan Turing", "", "", ""],
            &["Time", "", "", ""],
            &["8:00-9:00", "X", "", ""],
        ]);
        let sched = extract_schedule_in_year(&g, 2026);
        assert!(sched.rows.is_empty());
        assert_eq!(sched.date, None);
        assert_eq!(sched.warnings, vec![WARN_NO_DATE.to_string()]);
    }

    #[test]
    fn test_missing_header_is_a_warning() {
        let g = grid(&[&["Alan Turing", "", "2024-04-01"], &["8:00-9:00", "X", ""]]);
        let sched = extract_schedule_in_year(&g, 2026);
        assert!(sched.rows.is_empty());
        assert_eq!(sched.warnings, vec![WARN_NO_HEADER.to_string()]);
    }

    #[test]
    fn test_header_in_row_zero_is_not_the_sentinel() {
        let g = grid(&[&["Time", "", "2024-04-01"], &["8:00-9:00", "X", ""]]);
        let sched = extract_schedule_in_year(&g, 2026);
        assert_eq!(sched.warnings, vec![WARN_NO_HEADER.to_string()]);
    }

    #[test]
    fn test_unparseable_date_is_a_warning() {
        let g = grid(&[&["Alan Turing", "", "sometime soon"], &["Time", "", ""]]);
        let sched = extract_schedule_in_year(&g, 2026);
        assert!(sched.rows.is_empty());
        assert_eq!(sched.warnings, vec!["could not parse date: sometime soon".to_string()]);
    }

    #[test]
    fn test_only_first_header_row_counts() {
        let g = parse_tsv("T\t\t2024-04-01\nTime\nA\tB\nTime\nC\tD");
        let sched = extract_schedule_in_year(&g, 2026);
        assert_eq!(sched.rows.len(), 3);
        assert_eq!(sched.rows[1].time_range, "Time");
    }

    #[test]
    fn test_parse_sheet_date_formats() {
        let april_first = |y| NaiveDate::from_ymd_opt(y, 4, 1);
        assert_eq!(parse_sheet_date("2024-04-01", 2026), april_first(2024));
        assert_eq!(parse_sheet_date("4/1/2024", 2026), april_first(2024));
        assert_eq!(parse_sheet_date("4/1/24", 2026), april_first(2024));
        assert_eq!(parse_sheet_date("April 1, 2024", 2026), april_first(2024));
        assert_eq!(parse_sheet_date("Monday, April 1, 2024", 2026), april_first(2024));
        assert_eq!(parse_sheet_date("Monday, April 1", 2026), april_first(2026));
        assert_eq!(parse_sheet_date("Mon, Apr 1", 2026), april_first(2026));
        assert_eq!(parse_sheet_date("4/1", 2026), april_first(2026));
        assert_eq!(parse_sheet_date("not a date", 2026), None);
    }
}
