use std::path::PathBuf;

use anyhow::Result;
use owo_colors::OwoColorize;
use planner_core::config::PlannerConfig;
use planner_core::export::{FsDownloader, export_events};

use crate::utils::open_store;

pub fn run(config: &PlannerConfig, output: Option<PathBuf>, filename: Option<String>) -> Result<()> {
    let store = open_store(config);
    let dir = output.unwrap_or_else(|| PathBuf::from("."));
    let filename = filename.unwrap_or_else(|| config.export_filename.clone());

    let path = export_events(store.events(), &FsDownloader::new(dir), &filename)?;

    println!(
        "{}",
        format!("  Exported {} events to {}", store.events().len(), path.display()).green()
    );
    Ok(())
}
