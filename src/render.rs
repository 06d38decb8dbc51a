//! Colored terminal rendering of events.

use chrono::NaiveDate;
use owo_colors::{AnsiColors, OwoColorize};
use planner_core::event::{CalendarEvent, Occurrence};

pub trait Render {
    fn render(&self) -> String;
}

impl Render for CalendarEvent {
    fn render(&self) -> String {
        let mut line = format!(
            "{} {} {}",
            format_time_range(self),
            self.title,
            format!("[{}]", self.label).color(label_color(&self.label))
        );

        if let Some(rule) = &self.recurrence {
            let every = match rule.interval.get() {
                1 => rule.frequency.to_string(),
                n => format!("every {} ({})", n, rule.frequency),
            };
            line.push_str(&format!(" {}", format!("↻ {}", every).dimmed()));
        }
        if let Some(location) = &self.location {
            line.push_str(&format!(" {}", format!("@ {}", location).dimmed()));
        }
        if let Some(id) = self.id {
            line.push_str(&format!(" {}", format!("#{}", id).dimmed()));
        }

        line
    }
}

impl Render for Occurrence {
    fn render(&self) -> String {
        self.event.render()
    }
}

/// "Today", "Tomorrow", or e.g. "Wed Feb 25"
pub fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

/// "15:00-16:00" or "all-day"
fn format_time_range(event: &CalendarEvent) -> String {
    if event.is_all_day {
        return format!("{:>11}", "all-day");
    }
    format!(
        "{:>11}",
        format!("{}-{}", event.start.format("%H:%M"), event.end.format("%H:%M"))
    )
}

fn label_color(label: &str) -> AnsiColors {
    match label {
        "red" | "pink" => AnsiColors::Red,
        "green" | "teal" => AnsiColors::Green,
        "blue" | "indigo" => AnsiColors::Blue,
        "purple" => AnsiColors::Magenta,
        "yellow" | "amber" | "orange" => AnsiColors::Yellow,
        "cyan" => AnsiColors::Cyan,
        _ => AnsiColors::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_label() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 24).unwrap();
        assert_eq!(format_date_label(today, today), "Today");
        assert_eq!(format_date_label(today.succ_opt().unwrap(), today), "Tomorrow");
        assert_eq!(
            format_date_label(NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(), today),
            "Wed Feb 28"
        );
    }

    #[test]
    fn test_all_day_time_range() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 24)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut event = CalendarEvent::new("Holiday", "red", start);
        event.is_all_day = true;

        assert_eq!(format_time_range(&event).trim(), "all-day");
    }
}
