//! Desktop notifications via notify-rust.

use notify_rust::Notification;
use planner_core::error::{PlannerError, PlannerResult};
use planner_core::reminder::{Notifier, ReminderNotification};

const APP_NAME: &str = "planner";

pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn show(&self, notification: &ReminderNotification) -> PlannerResult<()> {
        Notification::new()
            .appname(APP_NAME)
            .summary(&notification.title)
            .body(&notification.body)
            .icon(&notification.icon)
            .show()
            .map_err(|e| PlannerError::Notification(e.to_string()))?;

        Ok(())
    }
}
