use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use planner_core::config::PlannerConfig;
use planner_core::event::EventId;

use crate::utils::open_store;

pub fn run(config: &PlannerConfig, id: i64) -> Result<()> {
    let mut store = open_store(config);
    let id = EventId(id);

    let event = store
        .find(id)
        .cloned()
        .with_context(|| format!("No event with id {}", id))?;

    let title = event.title.clone();
    store.delete(event);

    println!("{}", format!("  Deleted: {}", title).red());
    Ok(())
}
