//! Visible date windows.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};

use crate::date_math::end_of_day;

/// An inclusive range of whole days, `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    /// A window over `start..=end`. Bounds given in the wrong order are swapped.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if end < start {
            Window { start: end, end: start }
        } else {
            Window { start, end }
        }
    }

    /// A single day.
    pub fn day(date: NaiveDate) -> Self {
        Window::new(date, date)
    }

    /// Sunday through Saturday of the week containing `date`.
    pub fn week_of(date: NaiveDate) -> Self {
        let offset = date.weekday().num_days_from_sunday();
        let start = date - Days::new(u64::from(offset));
        Window::new(start, start + Days::new(6))
    }

    /// Window for a month view: the month itself padded by one whole month
    /// on either side, so events on leading/trailing grid days are covered.
    pub fn month_view(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let start = first.checked_sub_months(Months::new(1))?;
        let end = first.checked_add_months(Months::new(2))?.pred_opt()?;
        Some(Window::new(start, end))
    }

    /// Midnight at the start of the first day.
    pub fn start_instant(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// Last millisecond of the final day.
    pub fn end_instant(&self) -> NaiveDateTime {
        end_of_day(self.end.and_time(NaiveTime::MIN))
    }

    /// Whether `[start, end]` of an event overlaps this window.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start <= self.end_instant() && end >= self.start_instant()
    }

}
