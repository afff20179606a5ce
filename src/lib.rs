//! Candidate visit schedules: spreadsheet export to calendar and participation report.

pub mod calendar;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod participation;
pub mod schedule;
pub mod sheets;
pub mod table;
pub mod types;

pub use calendar::{synthesize, Calendar, CalendarEvent};
pub use error::Error;
pub use orchestrator::{fetch_schedule, fetch_schedules, FetchOptions, FetchProgress};
pub use participation::{counts_to_tsv, participation_report, MealType, ParticipationCount};
pub use schedule::{extract_schedule, Schedule, ScheduleRow};
pub use sheets::{SheetError, SheetSelector, SheetsClient, TableSource};
pub use table::{parse_tsv, CellGrid};
pub use types::Config;
