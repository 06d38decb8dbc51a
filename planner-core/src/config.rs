//! Planner configuration.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{PlannerError, PlannerResult};
use crate::export::DEFAULT_EXPORT_FILENAME;
use crate::reminder::DEFAULT_ICON;

static DEFAULT_DATA_DIR: &str = "~/.local/share/planner";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_export_filename() -> String {
    DEFAULT_EXPORT_FILENAME.to_string()
}

fn default_reminder_tick_secs() -> u64 {
    60
}

fn default_notification_icon() -> String {
    DEFAULT_ICON.to_string()
}

/// Configuration at ~/.config/planner/config.toml
///
/// Every field has a default, so a missing file is fine. Values can be
/// overridden with `PLANNER_*` environment variables (e.g. `PLANNER_DATA_DIR`).
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    /// Where saved events live
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_export_filename")]
    pub export_filename: String,

    #[serde(default = "default_reminder_tick_secs")]
    pub reminder_tick_secs: u64,

    /// Icon theme name or file path for reminder notifications
    #[serde(default = "default_notification_icon")]
    pub notification_icon: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            data_dir: default_data_dir(),
            export_filename: default_export_filename(),
            reminder_tick_secs: default_reminder_tick_secs(),
            notification_icon: default_notification_icon(),
        }
    }
}

impl PlannerConfig {
    pub fn config_path() -> PlannerResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| PlannerError::Config("Could not determine config directory".into()))?
            .join("planner");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default config path plus the environment.
    pub fn load() -> PlannerResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> PlannerResult<Self> {
        let config: PlannerConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("PLANNER"))
            .build()
            .map_err(|e| PlannerError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PlannerError::Config(e.to_string()))?;

        if config.reminder_tick_secs == 0 {
            return Err(PlannerError::Config(
                "reminder_tick_secs must be at least 1".into(),
            ));
        }

        Ok(config)
    }

    /// `data_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned())
    }

    pub fn reminder_tick(&self) -> Duration {
        Duration::from_secs(self.reminder_tick_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let config = PlannerConfig::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.export_filename, "mohit-planner-events.ics");
        assert_eq!(config.reminder_tick(), Duration::from_secs(60));
        assert_eq!(config.notification_icon, "logo192.png");
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/tmp/planner-data\"\nreminder_tick_secs = 5\n",
        )
        .unwrap();

        let config = PlannerConfig::load_from(&path).unwrap();

        assert_eq!(config.data_path(), PathBuf::from("/tmp/planner-data"));
        assert_eq!(config.reminder_tick_secs, 5);
        assert_eq!(config.export_filename, "mohit-planner-events.ics");
    }

    #[test]
    fn test_zero_tick_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "reminder_tick_secs = 0\n").unwrap();

        assert!(matches!(
            PlannerConfig::load_from(&path),
            Err(PlannerError::Config(_))
        ));
    }
}
