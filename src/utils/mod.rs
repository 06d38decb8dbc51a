//! Argument parsing and store access shared by the commands.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use planner_core::clock::SystemClock;
use planner_core::config::PlannerConfig;
use planner_core::date_math::days_in_month;
use planner_core::storage::FileStorage;
use planner_core::store::EventStore;
use planner_core::window::Window;

pub fn open_store(config: &PlannerConfig) -> EventStore<FileStorage> {
    EventStore::load(FileStorage::new(config.data_path()), Arc::new(SystemClock))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD", s))
}

pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .with_context(|| format!("Invalid time '{}'. Use HH:MM (24 hour)", s))
}

/// "YYYY-MM" to (year, month).
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}'. Use YYYY-MM", s))?;
    Ok((date.year(), date.month()))
}

/// What `list` expands over and what it prints.
///
/// A month is expanded over its padded month-view window but only its own
/// days are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListWindow {
    pub expand: Window,
    pub shown: Window,
}

impl ListWindow {
    fn exact(window: Window) -> Self {
        ListWindow {
            expand: window,
            shown: window,
        }
    }
}

/// The window `list` shows. Defaults to the current month.
pub fn resolve_window(
    month: Option<&str>,
    week: Option<&str>,
    day: Option<&str>,
) -> Result<ListWindow> {
    if let Some(day) = day {
        return Ok(ListWindow::exact(Window::day(parse_date(day)?)));
    }
    if let Some(week) = week {
        return Ok(ListWindow::exact(Window::week_of(parse_date(week)?)));
    }

    let (year, month) = match month {
        Some(m) => parse_month(m)?,
        None => {
            let today = today();
            (today.year(), today.month())
        }
    };

    let out_of_range = || anyhow::anyhow!("Month {}-{:02} is out of range", year, month);
    let expand = Window::month_view(year, month).ok_or_else(out_of_range)?;
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(out_of_range)?;
    let last = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))
        .ok_or_else(out_of_range)?;

    Ok(ListWindow {
        expand,
        shown: Window::new(first, last),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-02").unwrap(), (2024, 2));
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("february").is_err());
    }

    #[test]
    fn test_resolve_window_prefers_day_then_week() {
        let day = resolve_window(Some("2024-01"), Some("2024-01-10"), Some("2024-01-12")).unwrap();
        assert_eq!(day.shown, Window::day(NaiveDate::from_ymd_opt(2024, 1, 12).unwrap()));
        assert_eq!(day.expand, day.shown);

        let week = resolve_window(None, Some("2024-01-10"), None).unwrap().shown;
        assert_eq!(week.start, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
        assert_eq!(week.end, NaiveDate::from_ymd_opt(2024, 1, 13).unwrap());
    }

    #[test]
    fn test_resolve_window_month_view() {
        let window = resolve_window(Some("2024-02"), None, None).unwrap();
        assert_eq!(window.expand, Window::month_view(2024, 2).unwrap());
        assert_eq!(window.shown.start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(window.shown.end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_parse_time_rejects_garbage() {
        assert_eq!(
            parse_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert!(parse_time("9am").is_err());
    }
}
