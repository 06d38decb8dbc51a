//! Wall-clock date arithmetic.
//!
//! Month and year steps clamp to the last valid day of the target month:
//! Jan 31 + 1 month is Feb 28 (or 29), never Mar 2 or 3. The clamp is
//! applied to each step on its own, so a series started on the 31st that
//! passes through February continues on the 28th/29th afterwards.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Midnight at the start of the day containing `dt`.
pub fn start_of_day(dt: NaiveDateTime) -> NaiveDateTime {
    dt.date().and_time(NaiveTime::MIN)
}

/// Last millisecond of the day containing `dt` (23:59:59.999).
pub fn end_of_day(dt: NaiveDateTime) -> NaiveDateTime {
    dt.date()
        .and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or(dt)
}

/// Number of days in `month` of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    if month == 12 {
        return 31;
    }

    NaiveDate::from_ymd_opt(year, month + 1, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

// The `add_*` functions return `None` when the result is outside chrono's
// representable range.

pub fn add_days(dt: NaiveDateTime, days: u32) -> Option<NaiveDateTime> {
    dt.checked_add_signed(Duration::try_days(i64::from(days))?)
}

pub fn add_weeks(dt: NaiveDateTime, weeks: u32) -> Option<NaiveDateTime> {
    dt.checked_add_signed(Duration::try_weeks(i64::from(weeks))?)
}

/// Add `months` calendar months, clamping the day to the target month's length.
pub fn add_months(dt: NaiveDateTime, months: u32) -> Option<NaiveDateTime> {
    shift_months(dt, i64::from(months))
}

/// Add `years` calendar years; Feb 29 lands on Feb 28 in common years.
pub fn add_years(dt: NaiveDateTime, years: u32) -> Option<NaiveDateTime> {
    shift_months(dt, i64::from(years) * 12)
}

fn shift_months(dt: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let zero_based = i64::from(dt.month0()) + months;
    let year = i32::try_from(i64::from(dt.year()) + zero_based / 12).ok()?;
    let month = (zero_based % 12) as u32 + 1;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let day = dt.day().min(days_in_month(year, month));

    first.with_day(day).map(|date| date.and_time(dt.time()))
}
