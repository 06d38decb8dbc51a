//! Recurrence expansion for the visible window.
//!
//! Turns canonical events into the flat list a view renders. Non-recurring
//! events pass through untouched (windowing them is the view's job);
//! recurring events are stepped forward from their stored `start` and one
//! `Occurrence` is produced per instance that falls in the window.

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, warn};

use crate::date_math::{add_days, add_months, add_weeks, add_years};
use crate::event::{CalendarEvent, EventId, Frequency, Occurrence, RecurrenceRule};
use crate::window::Window;

/// A recoverable problem found while expanding.
///
/// The affected event keeps the occurrences generated before the problem;
/// the rest of the expansion is unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionDiagnostic {
    UnknownRecurrenceFrequency {
        event_id: Option<EventId>,
        title: String,
        frequency: String,
    },
}

impl fmt::Display for ExpansionDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpansionDiagnostic::UnknownRecurrenceFrequency {
                event_id,
                title,
                frequency,
            } => {
                let id = event_id.map(|id| id.to_string()).unwrap_or_default();
                write!(
                    f,
                    "Unknown recurrence frequency '{}' on event '{}' ({}); later occurrences skipped",
                    frequency, title, id
                )
            }
        }
    }
}

/// Result of expanding a set of events over a window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expansion {
    pub events: Vec<Occurrence>,
    pub diagnostics: Vec<ExpansionDiagnostic>,
}

/// Expand `events` over `window`.
///
/// Recurring series are stepped from `start` by `interval` units of their
/// frequency until the step reaches the end of the window, the rule's
/// `until`, or (without `until`) one year past the end of the window. An
/// instance is kept when it starts after midnight of the day before the
/// window, so an instance that began late on the previous day still shows.
pub fn expand(events: &[CalendarEvent], window: &Window) -> Expansion {
    let mut expansion = Expansion::default();

    for event in events {
        match &event.recurrence {
            None => expansion.events.push(Occurrence::single(event.clone())),
            Some(rule) => {
                if let Err(diagnostic) = expand_series(event, rule, window, &mut expansion.events)
                {
                    warn!("{}", diagnostic);
                    expansion.diagnostics.push(diagnostic);
                }
            }
        }
    }

    debug!(
        "Expanded {} events into {} occurrences for {}..={}",
        events.len(),
        expansion.events.len(),
        window.start,
        window.end
    );

    expansion
}

fn expand_series(
    event: &CalendarEvent,
    rule: &RecurrenceRule,
    window: &Window,
    out: &mut Vec<Occurrence>,
) -> Result<(), ExpansionDiagnostic> {
    let window_end = window.end_instant();
    let window_start = window.start_instant();
    let lookback = window_start
        .checked_sub_signed(Duration::days(1))
        .unwrap_or(window_start);
    let stop = rule
        .until
        .or_else(|| add_years(window_end, 1))
        .unwrap_or(NaiveDateTime::MAX);

    let mut current = event.start;

    while current < stop && current < window_end {
        if current > lookback {
            out.push(Occurrence::instance_of(event, current));
        }

        match step(current, rule) {
            Step::Next(next) => current = next,
            Step::OutOfRange => break,
            Step::Unknown => {
                return Err(ExpansionDiagnostic::UnknownRecurrenceFrequency {
                    event_id: event.id,
                    title: event.title.clone(),
                    frequency: rule.frequency.to_string(),
                });
            }
        }
    }

    Ok(())
}

enum Step {
    Next(NaiveDateTime),
    /// The next instant is past the last representable date; the series ends
    OutOfRange,
    /// A frequency this version cannot step
    Unknown,
}

fn step(current: NaiveDateTime, rule: &RecurrenceRule) -> Step {
    let n = rule.interval.get();
    let next = match rule.frequency {
        Frequency::Daily => add_days(current, n),
        Frequency::Weekly => add_weeks(current, n),
        Frequency::Monthly => add_months(current, n),
        Frequency::Yearly => add_years(current, n),
        Frequency::Other(_) => return Step::Unknown,
    };

    next.map_or(Step::OutOfRange, Step::Next)
}
