//! Who met the candidates, and over which meal.
//!
//! Pipeline: schedules → per-name events (`extract`) → canonical names
//! (`names`) → per-person counts sorted by total → TSV report.

pub mod extract;
pub mod names;

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::schedule::Schedule;

pub use extract::{classify, participation_events, split_names};
pub use names::{normalize_names, NameInfo};

/// Kind of slot a person shared with a candidate. Ordering is report column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum MealType {
    #[serde(rename = "breakfast")]
    Breakfast,
    #[serde(rename = "lunch")]
    Lunch,
    #[serde(rename = "1:1")]
    OneOnOne,
    #[serde(rename = "dinner")]
    Dinner,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::OneOnOne,
        MealType::Dinner,
    ];

    fn column_header(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::OneOnOne => "1:1",
            MealType::Dinner => "Dinner",
        }
    }
}

/// One (person, slot type, candidate) attribution from a single schedule row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationEvent {
    pub name: String,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub candidate: String,
}

/// Aggregated participation for one canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationCount {
    pub name: String,
    /// Always the sum of `counts`.
    pub total: u32,
    /// Every meal type is present, zero when unused.
    pub counts: BTreeMap<MealType, u32>,
    /// Distinct candidates, first-seen order.
    pub candidates: Vec<String>,
    pub events: Vec<ParticipationEvent>,
}

impl ParticipationCount {
    fn new(name: String) -> Self {
        Self {
            name,
            total: 0,
            counts: MealType::ALL.iter().map(|t| (*t, 0)).collect(),
            candidates: Vec::new(),
            events: Vec::new(),
        }
    }

    fn add(&mut self, event: &ParticipationEvent) {
        *self.counts.entry(event.meal_type).or_insert(0) += 1;
        self.total += 1;
        if !self.candidates.contains(&event.candidate) {
            self.candidates.push(event.candidate.clone());
        }
        self.events.push(event.clone());
    }

    pub fn count(&self, meal_type: MealType) -> u32 {
        self.counts.get(&meal_type).copied().unwrap_or(0)
    }
}

/// Group events by name (first-seen order), then stable-sort by descending total.
pub fn aggregate(events: &[ParticipationEvent]) -> Vec<ParticipationCount> {
    let mut counts: Vec<ParticipationCount> = Vec::new();
    let mut by_name: HashMap<&str, usize> = HashMap::new();

    for event in events {
        let slot = *by_name.entry(event.name.as_str()).or_insert_with(|| {
            counts.push(ParticipationCount::new(event.name.clone()));
            counts.len() - 1
        });
        counts[slot].add(event);
    }

    counts.sort_by(|a, b| b.total.cmp(&a.total));
    counts
}

/// Extract, normalize and aggregate participation across schedules.
pub fn participation_report(schedules: &[Schedule]) -> Vec<ParticipationCount> {
    let events = participation_events(schedules);
    let normalized = normalize_names(&events);
    let counts = aggregate(&normalized);
    log::info!(
        "participation: {} schedules, {} events, {} people",
        schedules.len(),
        normalized.len(),
        counts.len()
    );
    counts
}

/// Render counts as a TSV report with a header row; every row ends in `\n`.
pub fn counts_to_tsv(counts: &[ParticipationCount]) -> String {
    let mut header = vec!["Name", "Total"];
    header.extend(MealType::ALL.iter().map(MealType::column_header));
    header.push("Candidates");

    let mut tsv = header.join("\t");
    tsv.push('\n');

    for count in counts {
        let mut cells = vec![count.name.trim().to_string(), count.total.to_string()];
        cells.extend(MealType::ALL.iter().map(|t| count.count(*t).to_string()));
        cells.push(
            count
                .candidates
                .iter()
                .map(|c| c.trim())
                .collect::<Vec<_>>()
                .join(", "),
        );
        tsv.push_str(&cells.join("\t"));
        tsv.push('\n');
    }
    tsv
}
