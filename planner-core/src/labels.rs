//! Label registry derived from the canonical event set.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::event::CalendarEvent;

/// Labels offered when creating an event, in display order.
pub const LABEL_PALETTE: [&str; 12] = [
    "indigo", "gray", "green", "blue", "red", "purple", "yellow", "pink", "orange", "teal", "cyan",
    "amber",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub label: String,
    pub checked: bool,
}

/// Distinct labels of `events` in first-seen order.
///
/// A label already in `previous` keeps its `checked` state; a new label
/// starts checked. Labels no longer used by any event are dropped.
pub fn derive_labels(events: &[CalendarEvent], previous: &[Label]) -> Vec<Label> {
    let mut seen = HashSet::new();

    events
        .iter()
        .filter(|event| seen.insert(event.label.as_str()))
        .map(|event| Label {
            label: event.label.clone(),
            checked: previous
                .iter()
                .find(|l| l.label == event.label)
                .is_none_or(|l| l.checked),
        })
        .collect()
}

/// Derived labels memoized by store revision.
///
/// The list itself is never edited by hand; only `checked` flags are, and
/// those survive every refresh.
#[derive(Debug, Clone, Default)]
pub struct LabelRegistry {
    labels: Vec<Label>,
    revision: Option<u64>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        LabelRegistry::default()
    }

    /// Recompute from `events` unless `revision` was already seen.
    pub fn refresh(&mut self, events: &[CalendarEvent], revision: u64) -> &[Label] {
        if self.revision != Some(revision) {
            self.labels = derive_labels(events, &self.labels);
            self.revision = Some(revision);
        }
        &self.labels
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Set the checked state of `label`. Returns false if the label is unknown.
    pub fn set_checked(&mut self, label: &str, checked: bool) -> bool {
        match self.labels.iter_mut().find(|l| l.label == label) {
            Some(entry) => {
                entry.checked = checked;
                true
            }
            None => false,
        }
    }
}
