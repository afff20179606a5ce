//! Schedule → calendar events, and the `.ics` text block for them.
//!
//! Row handling, in order:
//!   1. Skip empty and `BREAK` person cells.
//!   2. Prefix the title for lunch/dinner slots.
//!   3. `Pickup/Breakfast` becomes `8:00-9:00`.
//!   4. A bare `DINNER` looks for a time in the notes (`6:30`, then `7pm`)
//!      and lasts two hours.
//!   5. Anything else without a `-` is a section label and is skipped.
//!
//! Times are floating local time (no zone), matching how the sheets are
//! written.

use std::sync::OnceLock;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::Serialize;

use crate::schedule::time::{anchor, parse_time, resolve_range, ClockTime};
use crate::schedule::{
    Schedule, ScheduleRow, BREAK, DINNER, LUNCH, PICKUP_BREAKFAST, PICKUP_BREAKFAST_RANGE,
};

pub const WARN_NO_DINNER_TIME: &str = "could not find time for dinner";

const DINNER_LENGTH_HOURS: i64 = 2;
const ICS_DATETIME_FORMAT: &str = "%Y%m%dT%H%M%S";
const ICS_PRODID: &str = "-//visitday//EN";

fn clock_in_notes_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+:[0-9]+").expect("valid regex"))
}

fn pm_hour_in_notes_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([0-9]+)(?:pm|PM)").expect("valid regex"))
}

/// One timed block of a visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub title: String,
    /// When the calendar was generated (DTSTAMP); shared by one synthesis run.
    pub stamp: NaiveDateTime,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub location: String,
    pub description: Option<String>,
}

/// Events for one schedule plus anything that could not be placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    pub title: String,
    pub events: Vec<CalendarEvent>,
    pub warnings: Vec<String>,
}

impl Calendar {
    pub fn to_ics(&self) -> String {
        events_to_ics(&self.events)
    }
}

/// Build the calendar for a schedule, stamped with the current local time.
pub fn synthesize(schedule: &Schedule) -> Calendar {
    synthesize_at(schedule, Local::now().naive_local())
}

pub fn synthesize_at(schedule: &Schedule, stamp: NaiveDateTime) -> Calendar {
    let mut calendar = Calendar {
        title: schedule.title.clone(),
        events: Vec::new(),
        warnings: schedule.warnings.clone(),
    };
    let Some(date) = schedule.date else {
        return calendar;
    };

    for row in &schedule.rows {
        match row_to_event(row, date, stamp) {
            Ok(Some(event)) => calendar.events.push(event),
            Ok(None) => {}
            Err(warning) => {
                log::warn!("{}: {} (row {:?})", schedule.title, warning, row.time_range);
                calendar.warnings.push(warning);
            }
        }
    }
    calendar
}

/// `Ok(None)` is a silent skip; `Err` is a skip worth a warning.
fn row_to_event(
    row: &ScheduleRow,
    date: NaiveDate,
    stamp: NaiveDateTime,
) -> Result<Option<CalendarEvent>, String> {
    let person = row.person.as_str();
    if person.is_empty() || person == BREAK {
        return Ok(None);
    }

    let mut title = person.to_string();
    if row.time_range.contains(LUNCH) {
        title = format!("Lunch: {}", title);
    }
    if row.time_range.contains(DINNER) {
        title = format!("Dinner: {}", title);
    }

    let time_range = if row.time_range == PICKUP_BREAKFAST {
        PICKUP_BREAKFAST_RANGE
    } else {
        row.time_range.as_str()
    };

    let (start_time, end_time) = if time_range == DINNER {
        let start = dinner_start(&row.notes)
            .and_then(|time| anchor(date, time))
            .ok_or_else(|| WARN_NO_DINNER_TIME.to_string())?;
        let end = start
            .checked_add_signed(Duration::hours(DINNER_LENGTH_HOURS))
            .ok_or_else(|| WARN_NO_DINNER_TIME.to_string())?;
        (start, end)
    } else {
        if !time_range.contains('-') {
            return Ok(None);
        }
        resolve_range(date, time_range)
            .map_err(|e| format!("could not parse time range: {} ({})", time_range, e))?
    };

    Ok(Some(CalendarEvent {
        title,
        stamp,
        start_time,
        end_time,
        location: row.room.clone(),
        description: (!row.notes.is_empty()).then(|| row.notes.clone()),
    }))
}

/// Recover a dinner start from free-text notes: `H:MM` first, then `Hpm`
/// with `H` in 1..=12.
fn dinner_start(notes: &str) -> Option<ClockTime> {
    if let Some(m) = clock_in_notes_re().find(notes) {
        if let Ok(time) = parse_time(m.as_str()) {
            return Some(time);
        }
    }
    let caps = pm_hour_in_notes_re().captures(notes)?;
    let hour: u32 = caps[1].parse().ok().filter(|h| (1..=12).contains(h))?;
    Some(ClockTime {
        hour: hour + 12,
        minute: 0,
    })
}

fn ics_datetime(dt: &NaiveDateTime) -> String {
    dt.format(ICS_DATETIME_FORMAT).to_string()
}

/// Render events as a VCALENDAR block. Each event gets a fresh UID.
pub fn events_to_ics(events: &[CalendarEvent]) -> String {
    let mut ics = format!("BEGIN:VCALENDAR\nVERSION:2.0\nPRODID:{}\n", ICS_PRODID);
    for event in events {
        ics.push_str(&event_to_ics(event));
    }
    ics.push_str("END:VCALENDAR");
    ics
}

fn event_to_ics(event: &CalendarEvent) -> String {
    let mut ics = String::from("BEGIN:VEVENT\n");
    ics.push_str(&format!("SUMMARY:{}\n", event.title));
    ics.push_str(&format!("DTSTART:{}\n", ics_datetime(&event.start_time)));
    ics.push_str(&format!("DTEND:{}\n", ics_datetime(&event.end_time)));
    ics.push_str(&format!("DTSTAMP:{}\n", ics_datetime(&event.stamp)));
    if let Some(description) = &event.description {
        ics.push_str(&format!("DESCRIPTION:{}\n", description));
    }
    ics.push_str(&format!("LOCATION:{}\n", event.location));
    ics.push_str(&format!("UID:{}\n", uuid::Uuid::new_v4()));
    ics.push_str("END:VEVENT\n");
    ics
}
