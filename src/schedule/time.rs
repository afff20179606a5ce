//! Free-text clock times → concrete local instants.
//!
//! Schedule sheets write times without AM/PM ("9:15", "1:30-2:15"). Hours
//! of 7 or below are read as afternoon/evening (`h + 12`); 8 and up are kept.
//! A 7:00 AM pickup therefore comes out as 19:00.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Hours at or below this value are shifted into the afternoon.
pub const PM_HEURISTIC_MAX_HOUR: u32 = 7;

/// An hour/minute pair after the AM/PM heuristic has been applied.
///
/// `hour` may exceed 23 when callers add to it (dinner end times); see
/// [`anchor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    #[error("missing ':' in time {0:?}")]
    MissingColon(String),
    #[error("no hour digits in time {0:?}")]
    MissingHour(String),
    #[error("no minute digits in time {0:?}")]
    MissingMinute(String),
    #[error("time out of range: {0:?}")]
    OutOfRange(String),
    #[error("missing '-' in time range {0:?}")]
    NotARange(String),
}

/// Parse `"H:MM"` into a [`ClockTime`], applying the ≤7 → PM heuristic.
///
/// The hour is the digit run ending right before the colon and the minute is
/// the digit run starting right after it, so surrounding labels are ignored:
/// `"LUNCH 12:00"` and `"1:00 LUNCH"` both parse.
pub fn parse_time(text: &str) -> Result<ClockTime, TimeParseError> {
    let (left, right) = text
        .split_once(':')
        .ok_or_else(|| TimeParseError::MissingColon(text.to_string()))?;

    let left = left.trim_end();
    let hour_start = left
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)
        .ok_or_else(|| TimeParseError::MissingHour(text.to_string()))?;
    let minute_digits: String = right
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    if minute_digits.is_empty() {
        return Err(TimeParseError::MissingMinute(text.to_string()));
    }

    let mut hour: u32 = left[hour_start..]
        .parse()
        .map_err(|_| TimeParseError::OutOfRange(text.to_string()))?;
    let minute: u32 = minute_digits
        .parse()
        .map_err(|_| TimeParseError::OutOfRange(text.to_string()))?;
    if hour > 23 || minute > 59 {
        return Err(TimeParseError::OutOfRange(text.to_string()));
    }

    if hour <= PM_HEURISTIC_MAX_HOUR {
        hour += 12;
    }
    Ok(ClockTime { hour, minute })
}

/// Place a clock time on `date`. Hours past 23 roll into the next day.
///
/// `None` when the result falls outside chrono's representable range.
pub fn anchor(date: NaiveDate, time: ClockTime) -> Option<NaiveDateTime> {
    let offset =
        Duration::hours(i64::from(time.hour)) + Duration::minutes(i64::from(time.minute));
    date.and_time(NaiveTime::MIN).checked_add_signed(offset)
}

/// Resolve `"HH:MM-HH:MM"` to start/end instants on `date`.
pub fn resolve_range(
    date: NaiveDate,
    range: &str,
) -> Result<(NaiveDateTime, NaiveDateTime), TimeParseError> {
    let (start, end) = range
        .split_once('-')
        .ok_or_else(|| TimeParseError::NotARange(range.to_string()))?;
    let place = |time| {
        anchor(date, time).ok_or_else(|| TimeParseError::OutOfRange(range.to_string()))
    };
    Ok((place(parse_time(start)?)?, place(parse_time(end)?)?))
}
