//! Per-row meeting classification and person-cell splitting.

use std::sync::OnceLock;

use regex::Regex;

use super::{MealType, ParticipationEvent};
use crate::schedule::{Schedule, ScheduleRow};

/// Runs of `, + ; &`, or a standalone `and`, with surrounding whitespace.
fn separator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*[,+;&]+\s*|\s+and\s+").expect("valid regex"))
}

/// Tokens in a person cell that are not people.
fn ignored_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:break|talk|talk prep|lunch|dinner|\?|\.+|grad(?:uate)?\s+student.*)$")
            .expect("valid regex")
    })
}

/// Classify a row by its time cell (case-insensitive). First match wins:
/// lunch, then pickup/breakfast, then dinner; anything else is a 1:1.
pub fn classify(row: &ScheduleRow) -> MealType {
    let time = row.time_range.to_lowercase();
    if time.contains("lunch") {
        MealType::Lunch
    } else if time.contains("pickup") || time.contains("breakfast") {
        MealType::Breakfast
    } else if time.contains("dinner") {
        MealType::Dinner
    } else {
        MealType::OneOnOne
    }
}

/// Split a person cell into individual names, dropping placeholders.
///
/// `"Alan Turing + ?"` → `["Alan Turing"]`; `"BREAK"` → `[]`.
pub fn split_names(person: &str) -> Vec<String> {
    separator_re()
        .split(person)
        .map(str::trim)
        .filter(|name| !name.is_empty() && !ignored_token_re().is_match(name))
        .map(str::to_string)
        .collect()
}

/// One participation event per name per row, attributed to the schedule title.
pub fn participation_events(schedules: &[Schedule]) -> Vec<ParticipationEvent> {
    let mut events = Vec::new();
    for schedule in schedules {
        for row in &schedule.rows {
            let meal_type = classify(row);
            for name in split_names(&row.person) {
                events.push(ParticipationEvent {
                    name,
                    meal_type,
                    candidate: schedule.title.clone(),
                });
            }
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(time_range: &str) -> ScheduleRow {
        ScheduleRow {
            time_range: time_range.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_precedence() {
        assert_eq!(classify(&row("12:00-1:00 LUNCH")), MealType::Lunch);
        assert_eq!(classify(&row("Pickup/Breakfast")), MealType::Breakfast);
        assert_eq!(classify(&row("breakfast")), MealType::Breakfast);
        assert_eq!(classify(&row("DINNER")), MealType::Dinner);
        assert_eq!(classify(&row("9:00-9:30")), MealType::OneOnOne);
        // Lunch is checked first.
        assert_eq!(classify(&row("Lunch / dinner")), MealType::Lunch);
    }

    #[test]
    fn test_split_names_separators() {
        assert_eq!(split_names("John Smith, Jane Doe"), vec!["John Smith", "Jane Doe"]);
        assert_eq!(split_names("A + B; C & D"), vec!["A", "B", "C", "D"]);
        assert_eq!(split_names("Tony Hoare and Robin Milner"), vec!["Tony Hoare", "Robin Milner"]);
        assert_eq!(split_names("Alexander Anderson"), vec!["Alexander Anderson"]);
        assert_eq!(split_names("A,, B"), vec!["A", "B"]);
    }

    #[test]
    fn test_split_names_filters_placeholders() {
        assert!(split_names("BREAK").is_empty());
        assert!(split_names("talk prep").is_empty());
        assert!(split_names("graduate students").is_empty());
        assert!(split_names("grad students").is_empty());
        assert_eq!(split_names("Alan Turing, graduate students"), vec!["Alan Turing"]);
        assert_eq!(split_names("Alan Turing + ?"), vec!["Alan Turing"]);
        assert_eq!(split_names("John Smith, ..."), vec!["John Smith"]);
    }

    #[test]
    fn test_split_names_whitespace() {
        assert_eq!(split_names(" John Smith "), vec!["John Smith"]);
        assert_eq!(split_names("John Smith,   Jane Doe"), vec!["John Smith", "Jane Doe"]);
        assert!(split_names("   ").is_empty());
    }

    #[test]
    fn test_participation_events_attribute_candidate() {
        let schedule = Schedule {
            title: "Alan Turing".into(),
            date: chrono::NaiveDate::from_ymd_opt(2024, 4, 1),
            rows: vec![
                ScheduleRow {
                    time_range: "Pickup/Breakfast".into(),
                    person: "Alonzo Church".into(),
                    ..Default::default()
                },
                ScheduleRow {
                    time_range: "9:00-9:30".into(),
                    person: "BREAK".into(),
                    ..Default::default()
                },
                ScheduleRow {
                    time_range: "DINNER".into(),
                    person: "Grace Hopper, Stephen Kleene".into(),
                    ..Default::default()
                },
            ],
            warnings: Vec::new(),
        };
        let events = participation_events(&[schedule]);
        let summary: Vec<(&str, MealType)> =
            events.iter().map(|e| (e.name.as_str(), e.meal_type)).collect();
        assert_eq!(
            summary,
            vec![
                ("Alonzo Church", MealType::Breakfast),
                ("Grace Hopper", MealType::Dinner),
                ("Stephen Kleene", MealType::Dinner),
            ]
        );
        assert!(events.iter().all(|e| e.candidate == "Alan Turing"));
    }
}
