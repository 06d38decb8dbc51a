//! Label and free-text filtering of an event list.

use std::collections::HashSet;

use crate::event::CalendarEvent;
use crate::labels::Label;

/// Keep the items whose label is checked in `labels` and, when `query` is
/// not blank, whose title, description or location contains it
/// (case-insensitive). Input order is preserved.
///
/// An item whose label is not in `labels` yet is dropped; it shows up once
/// the registry has been refreshed from the store.
pub fn filter_events<T>(items: &[T], labels: &[Label], query: &str) -> Vec<T>
where
    T: AsRef<CalendarEvent> + Clone,
{
    let checked: HashSet<&str> = labels
        .iter()
        .filter(|l| l.checked)
        .map(|l| l.label.as_str())
        .collect();

    let query = query.trim().to_lowercase();

    items
        .iter()
        .filter(|item| checked.contains(item.as_ref().label.as_str()))
        .filter(|item| query.is_empty() || matches_query(item.as_ref(), &query))
        .cloned()
        .collect()
}

/// `query` must already be lowercased.
fn matches_query(event: &CalendarEvent, query: &str) -> bool {
    [
        Some(event.title.as_str()),
        event.description.as_deref(),
        event.location.as_deref(),
    ]
    .into_iter()
    .map(|field| field.unwrap_or_default())
    .any(|field| field.to_lowercase().contains(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Occurrence;
    use chrono::NaiveDate;

    fn event(title: &str, label: &str) -> CalendarEvent {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        CalendarEvent::new(title, label, start)
    }

    fn label(name: &str, checked: bool) -> Label {
        Label {
            label: name.to_string(),
            checked,
        }
    }

    fn titles(events: &[CalendarEvent]) -> Vec<&str> {
        events.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn test_unchecked_label_is_excluded() {
        let events = vec![event("A", "blue"), event("B", "blue")];

        assert!(filter_events(&events, &[label("blue", false)], "").is_empty());
        assert_eq!(
            titles(&filter_events(&events, &[label("blue", true)], "")),
            vec!["A", "B"]
        );
    }

    #[test]
    fn test_unknown_label_is_excluded() {
        let events = vec![event("A", "blue"), event("B", "red")];

        let filtered = filter_events(&events, &[label("blue", true)], "");

        assert_eq!(titles(&filtered), vec!["A"]);
    }

    #[test]
    fn test_blank_query_returns_input() {
        let events = vec![event("A", "blue"), event("B", "blue")];

        let filtered = filter_events(&events, &[label("blue", true)], "   ");

        assert_eq!(filtered, events);
    }

    #[test]
    fn test_query_matches_description_case_insensitively() {
        let mut sync = event("Weekly", "blue");
        sync.description = Some("Team sync".to_string());
        let other = event("Dentist", "blue");

        let filtered = filter_events(&[sync.clone(), other], &[label("blue", true)], "team");

        assert_eq!(filtered, vec![sync]);
    }

    #[test]
    fn test_query_matches_title_and_location() {
        let mut office = event("Review", "blue");
        office.location = Some("Main OFFICE".to_string());
        let planning = event("Planning", "blue");
        let labels = [label("blue", true)];

        let events = [office, planning];

        assert_eq!(titles(&filter_events(&events, &labels, "office")), vec!["Review"]);
        assert_eq!(titles(&filter_events(&events, &labels, " PLAN ")), vec!["Planning"]);
    }

    #[test]
    fn test_missing_fields_do_not_match() {
        let events = vec![event("A", "blue")];

        assert!(filter_events(&events, &[label("blue", true)], "zzz").is_empty());
    }

    #[test]
    fn test_filters_occurrences_in_order() {
        let base = event("Gym", "teal");
        let occurrences = vec![
            Occurrence::single(event("Lunch", "green")),
            Occurrence::single(base.clone()),
            Occurrence::single(event("Swim", "teal")),
        ];

        let labels = [label("teal", true), label("green", false)];

        let filtered = filter_events(&occurrences, &labels, "");

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].event, base);
        assert_eq!(filtered[1].event.title, "Swim");
    }
}
