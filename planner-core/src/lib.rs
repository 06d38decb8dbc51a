//! Core of the planner.
//!
//! - `store`: the canonical event collection and its persistence
//! - `recurrence`: expansion of recurring events over a visible window
//! - `filter` / `labels`: label and free-text filtering
//! - `reminder`: the reminder scheduler
//! - `ics`: iCalendar export
//!
//! All date arithmetic is local wall-clock time; there is no time zone
//! handling anywhere in the crate.

pub mod clock;
pub mod config;
pub mod date_math;
pub mod draft;
pub mod error;
pub mod event;
pub mod export;
pub mod filter;
pub mod ics;
pub mod labels;
pub mod recurrence;
pub mod reminder;
pub mod storage;
pub mod store;
pub mod view;
pub mod window;

pub use error::{PlannerError, PlannerResult};
pub use event::{CalendarEvent, EventId, Frequency, Occurrence, RecurrenceRule};
