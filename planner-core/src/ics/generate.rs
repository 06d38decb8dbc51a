//! VCALENDAR document generation.

use chrono::NaiveDateTime;

use super::escape::escape_text;
use crate::event::CalendarEvent;

pub const PRODUCT_ID: &str = "-//Mohit Planner//EN";

/// Domain appended to event ids to form UIDs.
pub const UID_DOMAIN: &str = "mohitplanner.com";

/// Generate a VCALENDAR document for `events`, in input order.
///
/// Times are written as floating local times (`YYYYMMDDTHHMMSS`, no `Z`).
/// A recurrence is written as `RRULE:FREQ=...;INTERVAL=...`; its `until`
/// is not exported.
pub fn generate_ics(events: &[CalendarEvent]) -> String {
    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".into(),
        "VERSION:2.0".into(),
        format!("PRODID:{}", PRODUCT_ID),
        "CALSCALE:GREGORIAN".into(),
        "METHOD:PUBLISH".into(),
    ];

    for event in events {
        push_vevent(&mut lines, event);
    }

    lines.push("END:VCALENDAR".into());
    lines.join("\r\n")
}

fn push_vevent(lines: &mut Vec<String>, event: &CalendarEvent) {
    // Unsaved events have no id yet; their start instant stands in
    let uid = event
        .id
        .map(|id| id.0)
        .unwrap_or_else(|| event.start.and_utc().timestamp_millis());

    lines.push("BEGIN:VEVENT".into());
    lines.push(format!("UID:{}@{}", uid, UID_DOMAIN));
    lines.push(format!("DTSTART:{}", format_local(event.start)));
    lines.push(format!("DTEND:{}", format_local(event.end)));
    lines.push(format!("SUMMARY:{}", escape_text(&event.title)));

    if let Some(desc) = event.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("DESCRIPTION:{}", escape_text(desc)));
    }

    if let Some(loc) = event.location.as_deref().filter(|l| !l.is_empty()) {
        lines.push(format!("LOCATION:{}", escape_text(loc)));
    }

    if let Some(ref recurrence) = event.recurrence {
        lines.push(format!(
            "RRULE:FREQ={};INTERVAL={}",
            recurrence.frequency.as_str().to_uppercase(),
            recurrence.interval
        ));
    }

    lines.push("END:VEVENT".into());
}

fn format_local(dt: NaiveDateTime) -> String {
    dt.format("%Y%m%dT%H%M%S").to_string()
}
