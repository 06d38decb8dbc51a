//! Building canonical events from user input.
//!
//! An `EventDraft` holds what a user typed for one event. `into_action`
//! validates it and turns it into the store action that creates or edits
//! the event. This is the only place user input becomes a `CalendarEvent`,
//! so the invariants the rest of the core assumes (`end > start`,
//! `interval >= 1`, a non-blank title) are enforced here.

use std::num::NonZeroU32;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::date_math::{end_of_day, start_of_day};
use crate::error::{PlannerError, PlannerResult};
use crate::event::{CalendarEvent, EventId, Frequency, RecurrenceRule};
use crate::labels::LABEL_PALETTE;
use crate::store::StoreAction;

/// Repeat settings as entered; `interval` is checked when the draft is built.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatInput {
    pub frequency: Frequency,
    pub interval: u32,
    pub until: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    /// Set when editing an existing event
    pub id: Option<EventId>,
    pub title: String,
    pub description: String,
    pub location: String,
    pub label: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub is_all_day: bool,
    pub repeat: Option<RepeatInput>,
    /// Minutes before start; 0 means no reminder
    pub reminder: u32,
}

/// Default reminder of a new draft, in minutes.
pub const DEFAULT_REMINDER: u32 = 30;

impl EventDraft {
    /// A blank draft for `date` at 09:00-10:00 with a 30 minute reminder.
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        EventDraft {
            id: None,
            title: title.into(),
            description: String::new(),
            location: String::new(),
            label: None,
            date,
            start_time: default_start(),
            end_time: Some(default_start() + Duration::hours(1)),
            is_all_day: false,
            repeat: None,
            reminder: DEFAULT_REMINDER,
        }
    }

    /// A draft pre-filled from an existing event, for editing.
    pub fn from_event(event: &CalendarEvent) -> Self {
        EventDraft {
            id: event.id,
            title: event.title.clone(),
            description: event.description.clone().unwrap_or_default(),
            location: event.location.clone().unwrap_or_default(),
            label: Some(event.label.clone()),
            date: event.start.date(),
            start_time: event.start.time(),
            end_time: Some(event.end.time()),
            is_all_day: event.is_all_day,
            repeat: event.recurrence.as_ref().map(|r| RepeatInput {
                frequency: r.frequency.clone(),
                interval: r.interval.get(),
                until: r.until,
            }),
            reminder: event
                .reminder
                .and_then(|m| u32::try_from(m).ok())
                .unwrap_or(0),
        }
    }

    /// Validate and build the event.
    ///
    /// - the title must not be blank, and a repeat needs an interval of at least 1
    /// - end falls back to start + 1 hour when missing or not after start
    /// - an all-day event runs from the start of `date` to the end of its end day
    /// - blank description/location and a zero reminder are left unset
    pub fn build(&self) -> PlannerResult<CalendarEvent> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(PlannerError::InvalidEvent("title is required".into()));
        }

        let recurrence = self.repeat.as_ref().map(build_recurrence).transpose()?;

        let start = self.date.and_time(self.start_time);
        let end = match self.end_time {
            Some(t) if self.date.and_time(t) > start => self.date.and_time(t),
            _ => start + Duration::hours(1),
        };
        let (start, end) = if self.is_all_day {
            (start_of_day(start), end_of_day(end))
        } else {
            (start, end)
        };

        let label = self
            .label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(LABEL_PALETTE[0]);

        Ok(CalendarEvent {
            id: self.id,
            title: title.to_string(),
            description: non_blank(&self.description),
            location: non_blank(&self.location),
            label: label.to_string(),
            start,
            end,
            day: start_of_day(start),
            is_all_day: self.is_all_day,
            recurrence,
            reminder: (self.reminder > 0).then_some(i64::from(self.reminder)),
            reminder_shown: false,
        })
    }

    /// The store action for this draft: `Update` when editing, else `Push`.
    pub fn into_action(self) -> PlannerResult<StoreAction> {
        let event = self.build()?;
        Ok(match event.id {
            Some(_) => StoreAction::Update(event),
            None => StoreAction::Push(event),
        })
    }
}

fn build_recurrence(input: &RepeatInput) -> PlannerResult<RecurrenceRule> {
    if let Frequency::Other(ref f) = input.frequency {
        return Err(PlannerError::InvalidEvent(format!(
            "unknown repeat frequency '{}'",
            f
        )));
    }

    let interval = NonZeroU32::new(input.interval).ok_or_else(|| {
        PlannerError::InvalidEvent("repeat interval must be at least 1".into())
    })?;

    Ok(RecurrenceRule {
        frequency: input.frequency.clone(),
        interval,
        until: input.until,
    })
}

/// Start time of a new draft: 09:00.
fn default_start() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn non_blank(s: &str) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_new_draft_defaults() {
        let event = EventDraft::new("Standup", date(2024, 1, 8)).build().unwrap();

        assert_eq!(event.start, date(2024, 1, 8).and_time(time(9, 0)));
        assert_eq!(event.end, date(2024, 1, 8).and_time(time(10, 0)));
        assert_eq!(event.label, "indigo");
        assert_eq!(event.reminder, Some(30));
        assert_eq!(event.description, None);
        assert_eq!(event.location, None);
        assert_eq!(event.id, None);
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let result = EventDraft::new("   ", date(2024, 1, 8)).build();
        assert!(matches!(result, Err(PlannerError::InvalidEvent(_))));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let mut draft = EventDraft::new("Gym", date(2024, 1, 8));
        draft.repeat = Some(RepeatInput {
            frequency: Frequency::Weekly,
            interval: 0,
            until: None,
        });

        assert!(matches!(draft.build(), Err(PlannerError::InvalidEvent(_))));
    }

    #[test]
    fn test_unknown_frequency_is_rejected() {
        let mut draft = EventDraft::new("Gym", date(2024, 1, 8));
        draft.repeat = Some(RepeatInput {
            frequency: Frequency::Other("hourly".into()),
            interval: 1,
            until: None,
        });

        assert!(draft.build().is_err());
    }

    #[test]
    fn test_end_not_after_start_falls_back_to_one_hour() {
        let mut draft = EventDraft::new("Call", date(2024, 1, 8));
        draft.start_time = time(14, 0);
        draft.end_time = Some(time(13, 0));
        assert_eq!(draft.build().unwrap().end, date(2024, 1, 8).and_time(time(15, 0)));

        draft.end_time = None;
        assert_eq!(draft.build().unwrap().end, date(2024, 1, 8).and_time(time(15, 0)));
    }

    #[test]
    fn test_all_day_spans_whole_day() {
        let mut draft = EventDraft::new("Holiday", date(2024, 1, 8));
        draft.is_all_day = true;

        let event = draft.build().unwrap();

        assert_eq!(event.start, date(2024, 1, 8).and_time(time(0, 0)));
        assert_eq!(event.end, end_of_day(event.start));
        assert!(event.is_all_day);
    }

    #[test]
    fn test_zero_reminder_is_unset() {
        let mut draft = EventDraft::new("Call", date(2024, 1, 8));
        draft.reminder = 0;

        assert_eq!(draft.build().unwrap().reminder, None);
    }

    #[test]
    fn test_edit_roundtrip_produces_update() {
        let mut draft = EventDraft::new("Gym", date(2024, 1, 8));
        draft.location = "Club".into();
        draft.label = Some("teal".into());
        draft.repeat = Some(RepeatInput {
            frequency: Frequency::Weekly,
            interval: 2,
            until: None,
        });
        let mut event = draft.build().unwrap();
        event.id = Some(EventId(99));

        let edit = EventDraft::from_event(&event);
        let action = edit.into_action().unwrap();

        assert_eq!(action, StoreAction::Update(event));
    }

    #[test]
    fn test_new_draft_produces_push() {
        let action = EventDraft::new("Gym", date(2024, 1, 8)).into_action().unwrap();
        assert!(matches!(action, StoreAction::Push(_)));
    }
}
