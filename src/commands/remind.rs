use std::sync::Arc;

use anyhow::Result;
use owo_colors::OwoColorize;
use planner_core::clock::SystemClock;
use planner_core::config::PlannerConfig;
use planner_core::event::CalendarEvent;
use planner_core::reminder::ReminderScheduler;
use planner_core::storage::{FileStorage, Storage};
use planner_core::store::{EventSource, STORAGE_KEY, parse_events};
use tracing::warn;

use crate::notify::DesktopNotifier;

/// Events re-read from disk on every tick, so changes made by other
/// `planner` invocations are picked up while `remind` is running.
struct SavedEvents {
    storage: FileStorage,
}

impl EventSource for SavedEvents {
    fn canonical_events(&self) -> Vec<CalendarEvent> {
        let raw = self.storage.get(STORAGE_KEY).unwrap_or_else(|e| {
            warn!("Could not read saved events: {}", e);
            None
        });
        parse_events(raw.as_deref())
    }
}

pub async fn run(config: &PlannerConfig, once: bool) -> Result<()> {
    let source = Arc::new(SavedEvents {
        storage: FileStorage::new(config.data_path()),
    });

    let scheduler = ReminderScheduler::new(source, Arc::new(DesktopNotifier), Arc::new(SystemClock))
        .with_icon(&config.notification_icon);

    if once {
        let sent = scheduler.tick();
        if sent.is_empty() {
            println!("{}", "No reminders due".dimmed());
        }
        for notification in &sent {
            println!("  {} {}", "🔔".yellow(), notification.title);
        }
        return Ok(());
    }

    println!(
        "Checking for reminders every {}s. Press Ctrl-C to stop.",
        config.reminder_tick_secs
    );

    let handle = scheduler.spawn(config.reminder_tick());
    tokio::signal::ctrl_c().await?;
    handle.shutdown().await;

    println!("{}", "Stopped".dimmed());
    Ok(())
}
