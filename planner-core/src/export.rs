//! Saving exported calendars.

use std::path::PathBuf;

use tracing::info;

use crate::error::PlannerResult;
use crate::event::CalendarEvent;
use crate::ics::generate_ics;

/// File name used when the user does not pick one.
pub const DEFAULT_EXPORT_FILENAME: &str = "mohit-planner-events.ics";

pub const ICS_MIME_TYPE: &str = "text/calendar;charset=utf-8";

/// Somewhere an exported document can be saved.
pub trait FileDownloader {
    /// Save `text` as `filename`, returning where it ended up.
    fn save(&self, text: &str, filename: &str) -> PlannerResult<PathBuf>;
}

/// Saves into a directory on disk.
#[derive(Debug, Clone)]
pub struct FsDownloader {
    dir: PathBuf,
}

impl FsDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FsDownloader { dir: dir.into() }
    }
}

impl FileDownloader for FsDownloader {
    fn save(&self, text: &str, filename: &str) -> PlannerResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        std::fs::write(&path, text)?;
        Ok(path)
    }
}

/// Generate the ICS document for `events` and save it through `downloader`.
pub fn export_events(
    events: &[CalendarEvent],
    downloader: &dyn FileDownloader,
    filename: &str,
) -> PlannerResult<PathBuf> {
    let ics = generate_ics(events);
    let path = downloader.save(&ics, filename)?;
    info!("Exported {} events to {}", events.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_export_writes_ics_file() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = FsDownloader::new(dir.path());
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let events = vec![CalendarEvent::new("Standup", "blue", start)];

        let path = export_events(&events, &downloader, DEFAULT_EXPORT_FILENAME).unwrap();

        assert_eq!(path, dir.path().join("mohit-planner-events.ics"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(content.contains("SUMMARY:Standup"));
        assert!(content.ends_with("END:VCALENDAR"));
    }
}
