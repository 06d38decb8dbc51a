use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use planner_core::config::PlannerConfig;
use planner_core::draft::EventDraft;
use planner_core::event::EventId;

use crate::EventFields;
use crate::commands::add::apply_fields;
use crate::render::Render;
use crate::utils::open_store;

pub fn run(
    config: &PlannerConfig,
    id: i64,
    title: Option<String>,
    no_repeat: bool,
    fields: EventFields,
) -> Result<()> {
    let mut store = open_store(config);
    let id = EventId(id);

    let existing = store
        .find(id)
        .with_context(|| format!("No event with id {}", id))?;

    let mut draft = EventDraft::from_event(existing);
    if let Some(title) = title {
        draft.title = title;
    }
    if no_repeat {
        draft.repeat = None;
    }
    apply_fields(&mut draft, fields)?;

    store.dispatch(draft.into_action()?);

    let event = store.find(id).context("Event was not saved")?;
    println!("{}", format!("  Updated: {}", event.title).yellow());
    println!("  {}", event.render());

    Ok(())
}
