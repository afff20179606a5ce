//! Canonical-name inference from the batch itself.
//!
//! Schedules mention the same person as "Alan Turing", "Turing" or "Alan".
//! There is no directory to consult, so full-name-shaped mentions in the batch
//! define the canonical names, and their first/second tokens become lookup
//! keys for partial mentions. A token that belongs to two different full
//! names is ambiguous and is never used.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use super::ParticipationEvent;

/// Two or three capitalized tokens, e.g. "Alan Turing", "Grace B. Hopper".
fn full_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Z][\w'\-]*\.?)\s+([A-Z][\w'\-]*\.?)(?:\s+[A-Z][\w'\-]*\.?)?$")
            .expect("valid regex")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyState {
    Canonical(String),
    /// Seen for two different full names. Stays tombstoned for the whole run.
    Ambiguous,
}

/// Remap table and canonical-name set inferred from one batch of names.
#[derive(Debug, Clone, Default)]
pub struct NameInfo {
    /// Keys in first-inserted order; the order breaks ties in [`NameInfo::resolve`].
    keys: Vec<(String, KeyState)>,
    index: HashMap<String, usize>,
    all_names: HashSet<String>,
}

impl NameInfo {
    /// Infer from names in batch order. Repeats of the same full name are
    /// harmless; only a key shared by different full names is tombstoned.
    pub fn infer<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut info = Self::default();
        for name in names {
            let Some(caps) = full_name_re().captures(name) else {
                continue;
            };
            if !info.all_names.insert(name.to_string()) {
                continue;
            }
            info.record(&caps[1], name);
            info.record(&caps[2], name);
        }
        info
    }

    fn record(&mut self, token: &str, full_name: &str) {
        match self.index.get(token).copied() {
            Some(i) => {
                let state = &mut self.keys[i].1;
                let rebound = matches!(
                    state,
                    KeyState::Canonical(existing) if existing.as_str() != full_name
                );
                if rebound {
                    log::debug!("name key {:?} is ambiguous; dropping it", token);
                    *state = KeyState::Ambiguous;
                }
            }
            None => {
                self.index.insert(token.to_string(), self.keys.len());
                self.keys
                    .push((token.to_string(), KeyState::Canonical(full_name.to_string())));
            }
        }
    }

    pub fn all_names(&self) -> &HashSet<String> {
        &self.all_names
    }

    /// Unambiguous key → canonical name pairs, in first-inserted order.
    pub fn remap(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.keys.iter().filter_map(|(token, state)| match state {
            KeyState::Canonical(full) => Some((token.as_str(), full.as_str())),
            KeyState::Ambiguous => None,
        })
    }

    #[cfg(test)]
    fn is_ambiguous(&self, token: &str) -> bool {
        self.index
            .get(token)
            .is_some_and(|&i| self.keys[i].1 == KeyState::Ambiguous)
    }

    /// Canonical form of `name`.
    ///
    /// Canonical names map to themselves. Otherwise the longest unambiguous
    /// key contained in `name` wins, with earlier-inserted keys winning ties.
    /// Names with no matching key are returned unchanged.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        if self.all_names.contains(name) {
            return name;
        }
        let mut best: Option<(&str, &str)> = None;
        for (token, full) in self.remap() {
            if name.contains(token) && best.is_none_or(|(b, _)| token.len() > b.len()) {
                best = Some((token, full));
            }
        }
        best.map(|(_, full)| full).unwrap_or(name)
    }
}

/// Rewrite every event's name to its canonical form. Returns a new list; the
/// input is left untouched.
pub fn normalize_names(events: &[ParticipationEvent]) -> Vec<ParticipationEvent> {
    let info = NameInfo::infer(events.iter().map(|e| e.name.as_str()));
    events
        .iter()
        .map(|event| {
            let name = info.resolve(&event.name);
            if name != event.name {
                log::debug!("normalized {:?} -> {:?}", event.name, name);
            }
            ParticipationEvent {
                name: name.to_string(),
                ..event.clone()
            }
        })
        .collect()
}
