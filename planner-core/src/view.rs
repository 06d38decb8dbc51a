//! What a calendar view shows: expansion followed by filtering.

use crate::event::CalendarEvent;
use crate::filter::filter_events;
use crate::labels::Label;
use crate::recurrence::{Expansion, expand};
use crate::window::Window;

/// Expand `events` over `window`, then keep what `labels` and `query` allow.
///
/// Pure; the result depends only on the arguments, so callers may cache it
/// keyed on (store revision, window, labels, query).
pub fn visible_events(
    events: &[CalendarEvent],
    window: &Window,
    labels: &[Label],
    query: &str,
) -> Expansion {
    let expansion = expand(events, window);

    Expansion {
        events: filter_events(&expansion.events, labels, query),
        diagnostics: expansion.diagnostics,
    }
}
