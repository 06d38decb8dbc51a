//! Planner event types.
//!
//! `CalendarEvent` is the canonical, persisted record a user authors.
//! `Occurrence` is what the recurrence expander hands to a view: either a
//! canonical event passed through untouched, or one generated instance of
//! a recurring series.
//!
//! All timestamps are local wall-clock values (`NaiveDateTime`). They are
//! persisted as integer epoch milliseconds of that wall-clock value.

use std::fmt;
use std::num::NonZeroU32;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::date_math::{end_of_day, start_of_day};

/// Identifier of a canonical event, derived from the creation instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub i64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A canonical calendar event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredEvent")]
pub struct CalendarEvent {
    /// Assigned by the store on push when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EventId>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub label: String,
    #[serde(with = "chrono::naive::serde::ts_milliseconds")]
    pub start: NaiveDateTime,
    #[serde(with = "chrono::naive::serde::ts_milliseconds")]
    pub end: NaiveDateTime,
    /// Start of the day containing `start`; recomputed by `normalize`
    #[serde(with = "chrono::naive::serde::ts_milliseconds")]
    pub day: NaiveDateTime,
    pub is_all_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
    /// Minutes before `start` at which to remind
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder: Option<i64>,
    pub reminder_shown: bool,
}

impl CalendarEvent {
    /// A one-hour event with no id, label `label` and nothing optional set.
    pub fn new(title: impl Into<String>, label: impl Into<String>, start: NaiveDateTime) -> Self {
        CalendarEvent {
            id: None,
            title: title.into(),
            description: None,
            location: None,
            label: label.into(),
            start,
            end: start + Duration::hours(1),
            day: start_of_day(start),
            is_all_day: false,
            recurrence: None,
            reminder: None,
            reminder_shown: false,
        }
    }

    /// Re-derive the fields that must never be trusted from storage.
    ///
    /// - `day` is the start of the day containing `start`
    /// - a timed event whose `end` is not after `start` lasts one hour
    /// - an all-day event ends at the end of its nominal end date
    ///
    /// Idempotent: `e.normalize().normalize() == e.normalize()`.
    pub fn normalize(mut self) -> Self {
        if self.is_all_day {
            self.end = end_of_day(self.end.max(self.start));
        } else if self.end <= self.start {
            self.end = self.start + Duration::hours(1);
        }
        self.day = start_of_day(self.start);
        self
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }
}

/// How often a recurring event repeats.
///
/// Persisted data may carry a frequency this version does not know; it is
/// kept as `Other` so the expander can report it instead of failing the load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Other(String),
}

impl Frequency {
    pub fn as_str(&self) -> &str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
            Frequency::Other(s) => s,
        }
    }
}

impl From<String> for Frequency {
    fn from(s: String) -> Self {
        match s.as_str() {
            "daily" => Frequency::Daily,
            "weekly" => Frequency::Weekly,
            "monthly" => Frequency::Monthly,
            "yearly" => Frequency::Yearly,
            _ => Frequency::Other(s),
        }
    }
}

impl From<Frequency> for String {
    fn from(f: Frequency) -> Self {
        f.as_str().to_string()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recurrence rule: repeat every `interval` units of `frequency`, optionally
/// stopping before `until`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredRecurrence")]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: NonZeroU32,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::naive::serde::ts_milliseconds_option"
    )]
    pub until: Option<NaiveDateTime>,
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency, interval: NonZeroU32) -> Self {
        RecurrenceRule {
            frequency,
            interval,
            until: None,
        }
    }

    pub fn until(mut self, until: NaiveDateTime) -> Self {
        self.until = Some(until);
        self
    }
}

/// One entry of an expansion result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    /// The parent's fields, with `start`, `end` and `day` set for this instance
    #[serde(flatten)]
    pub event: CalendarEvent,
    pub is_recurring: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EventId>,
}

impl Occurrence {
    /// A non-recurring event shown as-is.
    pub fn single(event: CalendarEvent) -> Self {
        Occurrence {
            event,
            is_recurring: false,
            parent_id: None,
        }
    }

    /// An instance of `parent` starting at `start`, keeping the parent's duration.
    pub fn instance_of(parent: &CalendarEvent, start: NaiveDateTime) -> Self {
        let mut event = parent.clone();
        event.start = start;
        event.end = start + parent.duration();
        event.day = start_of_day(start);

        Occurrence {
            event,
            is_recurring: true,
            parent_id: parent.id,
        }
    }

    /// Key that distinguishes instances of the same series.
    ///
    /// Instances share their parent's `id`, so views that need a unique key
    /// per rendered item use this instead: `<id>-<start millis>`.
    pub fn instance_key(&self) -> String {
        let id = self
            .event
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "new".to_string());
        if self.is_recurring {
            format!("{}-{}", id, self.event.start.and_utc().timestamp_millis())
        } else {
            id
        }
    }
}

impl AsRef<CalendarEvent> for Occurrence {
    fn as_ref(&self) -> &CalendarEvent {
        &self.event
    }
}

impl AsRef<CalendarEvent> for CalendarEvent {
    fn as_ref(&self) -> &CalendarEvent {
        self
    }
}

// Lenient on-disk shapes. Events written by older versions may lack `end`,
// `day`, `isAllDay` or `reminderShown`, and may carry a zero interval.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEvent {
    id: Option<EventId>,
    #[serde(default)]
    title: String,
    description: Option<String>,
    location: Option<String>,
    #[serde(default)]
    label: String,
    #[serde(default, with = "chrono::naive::serde::ts_milliseconds_option")]
    start: Option<NaiveDateTime>,
    #[serde(default, with = "chrono::naive::serde::ts_milliseconds_option")]
    end: Option<NaiveDateTime>,
    #[serde(default, with = "chrono::naive::serde::ts_milliseconds_option")]
    day: Option<NaiveDateTime>,
    #[serde(default)]
    is_all_day: bool,
    recurrence: Option<RecurrenceRule>,
    reminder: Option<i64>,
    #[serde(default)]
    reminder_shown: bool,
}

impl TryFrom<StoredEvent> for CalendarEvent {
    type Error = String;

    fn try_from(stored: StoredEvent) -> Result<Self, Self::Error> {
        let start = stored
            .start
            .or(stored.day)
            .ok_or_else(|| "event has neither start nor day".to_string())?;
        let end = stored.end.unwrap_or(start + Duration::hours(1));

        Ok(CalendarEvent {
            id: stored.id,
            title: stored.title,
            description: stored.description,
            location: stored.location,
            label: stored.label,
            start,
            end,
            day: start_of_day(start),
            is_all_day: stored.is_all_day,
            recurrence: stored.recurrence,
            reminder: stored.reminder,
            reminder_shown: stored.reminder_shown,
        })
    }
}

#[derive(Deserialize)]
struct StoredRecurrence {
    frequency: Frequency,
    #[serde(default)]
    interval: Option<i64>,
    #[serde(default, with = "chrono::naive::serde::ts_milliseconds_option")]
    until: Option<NaiveDateTime>,
}

impl From<StoredRecurrence> for RecurrenceRule {
    fn from(stored: StoredRecurrence) -> Self {
        // A missing or non-positive interval repeats every unit
        let interval = stored
            .interval
            .and_then(|n| u32::try_from(n).ok())
            .and_then(NonZeroU32::new)
            .unwrap_or(NonZeroU32::MIN);

        RecurrenceRule {
            frequency: stored.frequency,
            interval,
            until: stored.until,
        }
    }
}
