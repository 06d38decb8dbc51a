use anyhow::Result;
use owo_colors::OwoColorize;
use planner_core::config::PlannerConfig;
use planner_core::event::Occurrence;
use planner_core::labels::LabelRegistry;
use planner_core::view::visible_events;
use tracing::warn;

use crate::render::{Render, format_date_label};
use crate::utils::{ListWindow, open_store, today};

pub fn run(config: &PlannerConfig, window: ListWindow, search: &str, hide: &[String]) -> Result<()> {
    let store = open_store(config);

    let mut registry = LabelRegistry::new();
    registry.refresh(store.events(), store.revision());
    for label in hide {
        if !registry.set_checked(label, false) {
            warn!("No events use label '{}'", label);
        }
    }

    let expansion = visible_events(store.events(), &window.expand, registry.labels(), search);

    for diagnostic in &expansion.diagnostics {
        eprintln!("{}", diagnostic.to_string().yellow());
    }

    let shown = in_window(expansion.events, &window);

    if shown.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    // Group events by day and print
    let today = today();
    let mut current_date = None;

    for occurrence in &shown {
        let date = occurrence.event.start.date();

        if current_date != Some(date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", format_date_label(date, today).bold());
            current_date = Some(date);
        }

        println!("  {}", occurrence.render());
    }

    Ok(())
}

/// Occurrences overlapping the printed window, sorted by start.
fn in_window(occurrences: Vec<Occurrence>, window: &ListWindow) -> Vec<Occurrence> {
    let mut shown: Vec<Occurrence> = occurrences
        .into_iter()
        .filter(|o| window.shown.overlaps(o.event.start, o.event.end))
        .collect();

    shown.sort_by_key(|o| o.event.start);
    shown
}
