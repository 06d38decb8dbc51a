//! iCalendar export.
//!
//! Writes canonical events (never expanded occurrences) as a VCALENDAR
//! document, one VEVENT per event. Only the subset of RFC 5545 the planner
//! needs is produced.

mod escape;
mod generate;

pub use escape::{escape_text, unescape_text};
pub use generate::{PRODUCT_ID, UID_DOMAIN, generate_ics};
