use anyhow::Result;
use owo_colors::OwoColorize;
use planner_core::config::PlannerConfig;
use planner_core::labels::LabelRegistry;

use crate::utils::open_store;

pub fn run(config: &PlannerConfig) -> Result<()> {
    let store = open_store(config);
    let mut registry = LabelRegistry::new();
    let labels = registry.refresh(store.events(), store.revision());

    if labels.is_empty() {
        println!("{}", "No labels in use".dimmed());
        return Ok(());
    }

    for label in labels {
        let count = store
            .events()
            .iter()
            .filter(|e| e.label == label.label)
            .count();
        println!("  {} {}", label.label, format!("({})", count).dimmed());
    }

    Ok(())
}
