use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use planner_core::config::PlannerConfig;
use planner_core::draft::{EventDraft, RepeatInput};
use planner_core::event::Frequency;

use crate::EventFields;
use crate::render::Render;
use crate::utils::{open_store, parse_date, parse_time, today};

pub fn run(config: &PlannerConfig, title: String, fields: EventFields) -> Result<()> {
    let date = match fields.date.as_deref() {
        Some(d) => parse_date(d)?,
        None => today(),
    };

    let mut draft = EventDraft::new(title, date);
    apply_fields(&mut draft, fields)?;

    let mut store = open_store(config);
    let action = draft.into_action()?;
    let id = store
        .dispatch(action)
        .context("Event was not assigned an id")?;

    let event = store.find(id).context("Event was not saved")?;
    println!("{}", format!("  Created: {}", event.title).green());
    println!("  {}", event.render());

    Ok(())
}

/// Copy the given fields onto `draft`, leaving the others as they are.
pub fn apply_fields(draft: &mut EventDraft, fields: EventFields) -> Result<()> {
    if let Some(date) = fields.date.as_deref() {
        draft.date = parse_date(date)?;
    }

    if let Some(start) = fields.start.as_deref() {
        let start = parse_time(start)?;
        // Moving the start keeps an explicit end only if one was given
        if fields.end.is_none() {
            draft.end_time = None;
        }
        draft.start_time = start;
    }
    if let Some(end) = fields.end.as_deref() {
        draft.end_time = Some(parse_time(end)?);
    }
    if let Some(all_day) = fields.all_day {
        draft.is_all_day = all_day;
    }

    if let Some(label) = fields.label {
        draft.label = Some(label);
    }
    if let Some(description) = fields.description {
        draft.description = description;
    }
    if let Some(location) = fields.location {
        draft.location = location;
    }
    if let Some(reminder) = fields.reminder {
        draft.reminder = reminder;
    }

    if let Some(frequency) = fields.repeat {
        draft.repeat = Some(RepeatInput {
            frequency: Frequency::from(frequency.to_lowercase()),
            interval: 1,
            until: None,
        });
    }
    if fields.every.is_some() || fields.until.is_some() {
        let repeat = draft
            .repeat
            .as_mut()
            .context("--every and --until need a repeating event (use --repeat)")?;
        if let Some(every) = fields.every {
            repeat.interval = every;
        }
        if let Some(until) = fields.until.as_deref() {
            repeat.until = Some(planner_core::date_math::end_of_day(
                parse_date(until)?.and_time(chrono::NaiveTime::MIN),
            ));
        }
    }

    Ok(())
}
