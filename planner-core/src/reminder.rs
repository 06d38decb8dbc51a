//! Reminder scheduling.
//!
//! Once per tick the canonical (non-expanded) events are scanned, and every
//! event whose reminder instant falls in the minute starting at `now` is
//! handed to the `Notifier`. Recurring series are reminded only at their
//! stored `start`; generated instances are not reminded on their own.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use chrono::{Duration, NaiveDateTime};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::error::PlannerResult;
use crate::event::CalendarEvent;
use crate::store::EventSource;

/// Default tick period.
pub const TICK_PERIOD: StdDuration = StdDuration::from_secs(60);

/// Default notification icon.
///
/// A relative name rather than a web-root path like `/logo192.png`: desktop
/// notifiers take an icon theme name or a file path, and an absolute path
/// would point at the filesystem root.
pub const DEFAULT_ICON: &str = "logo192.png";

/// When `event`'s reminder fires, if it has one.
pub fn reminder_time(event: &CalendarEvent) -> Option<NaiveDateTime> {
    match event.reminder {
        Some(minutes) if minutes > 0 => Some(event.start - Duration::minutes(minutes)),
        _ => None,
    }
}

/// Whether `event` is due at `now`: `now` lies in
/// `[reminder_time, reminder_time + 1 minute)` and it was not shown yet.
pub fn is_due(event: &CalendarEvent, now: NaiveDateTime) -> bool {
    if event.reminder_shown {
        return false;
    }

    reminder_time(event).is_some_and(|at| now >= at && now < at + Duration::minutes(1))
}

/// The events of `events` that are due at `now`, in input order.
pub fn due_reminders(events: &[CalendarEvent], now: NaiveDateTime) -> Vec<&CalendarEvent> {
    events.iter().filter(|e| is_due(e, now)).collect()
}

/// A notification ready to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderNotification {
    pub title: String,
    pub body: String,
    /// Notifications with the same tag replace each other
    pub tag: String,
    pub icon: String,
}

impl ReminderNotification {
    pub fn for_event(event: &CalendarEvent, icon: &str) -> Self {
        let body = match event.description.as_deref() {
            Some(desc) if !desc.is_empty() => desc.to_string(),
            _ => format!("Event starts at {}", format_clock_time(event.start)),
        };

        let tag = match event.id {
            Some(id) => format!("reminder-{}", id),
            None => "reminder-new".to_string(),
        };

        ReminderNotification {
            title: format!("Reminder: {}", event.title),
            body,
            tag,
            icon: icon.to_string(),
        }
    }
}

/// `h:mm AM/PM`, e.g. `9:05 AM`.
pub fn format_clock_time(dt: NaiveDateTime) -> String {
    dt.format("%-I:%M %p").to_string()
}

/// Somewhere to show reminder notifications.
pub trait Notifier: Send + Sync {
    /// Ask the host for permission to notify. Called once when the scheduler starts.
    fn request_permission(&self) -> PlannerResult<()> {
        Ok(())
    }

    fn show(&self, notification: &ReminderNotification) -> PlannerResult<()>;
}

/// Used when the host has no notification surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn show(&self, notification: &ReminderNotification) -> PlannerResult<()> {
        debug!("No notification surface; dropping '{}'", notification.title);
        Ok(())
    }
}

/// Keeps every notification it is asked to show.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<ReminderNotification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        RecordingNotifier::default()
    }

    pub fn shown(&self) -> Vec<ReminderNotification> {
        self.shown
            .lock()
            .map(|shown| shown.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, notification: &ReminderNotification) -> PlannerResult<()> {
        let mut shown = self.shown.lock().unwrap_or_else(|e| e.into_inner());
        shown.push(notification.clone());
        Ok(())
    }
}

/// Scans events and hands due reminders to a notifier.
pub struct ReminderScheduler {
    source: Arc<dyn EventSource>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    icon: String,
    ticking: AtomicBool,
}

impl ReminderScheduler {
    pub fn new(
        source: Arc<dyn EventSource>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        ReminderScheduler {
            source,
            notifier,
            clock,
            icon: DEFAULT_ICON.to_string(),
            ticking: AtomicBool::new(false),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Evaluate once at the clock's current time.
    ///
    /// Returns the notifications handed to the notifier. A tick that starts
    /// while another is still running does nothing.
    pub fn tick(&self) -> Vec<ReminderNotification> {
        let Some(_guard) = TickGuard::acquire(&self.ticking) else {
            warn!("Previous reminder tick still running; skipping");
            return Vec::new();
        };

        let now = self.clock.now();
        let events = self.source.canonical_events();
        let mut sent = Vec::new();

        for event in due_reminders(&events, now) {
            let notification = ReminderNotification::for_event(event, &self.icon);
            match self.notifier.show(&notification) {
                Ok(()) => {
                    info!("Reminder shown for '{}'", event.title);
                    sent.push(notification);
                }
                Err(e) => error!("Failed to show reminder for '{}': {}", event.title, e),
            }
        }

        sent
    }

    /// Run `tick` every `period` on the current tokio runtime until the
    /// returned handle is shut down or dropped.
    pub fn spawn(self, period: StdDuration) -> SchedulerHandle {
        if let Err(e) = self.notifier.request_permission() {
            warn!("Notification permission not granted: {}", e);
        }

        let token = CancellationToken::new();
        let child = token.child_token();
        let scheduler = Arc::new(self);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of a tokio interval completes immediately
            interval.tick().await;

            info!("Reminder scheduler started ({}s period)", period.as_secs());

            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = interval.tick() => {
                        scheduler.tick();
                    }
                }
            }

            info!("Reminder scheduler stopped");
        });

        SchedulerHandle {
            token,
            task: Some(task),
        }
    }
}

/// Holds the tick flag; clears it on drop, including when a notifier panics.
struct TickGuard<'a>(&'a AtomicBool);

impl<'a> TickGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(TickGuard(flag))
        }
    }
}

impl Drop for TickGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the running timer; cancelling it (explicitly or by drop) stops ticks.
pub struct SchedulerHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the timer and wait for the task to finish.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!("Reminder scheduler task failed: {}", e);
            }
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::event::EventId;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn reminded(start: NaiveDateTime, minutes: i64) -> CalendarEvent {
        let mut event = CalendarEvent::new("Team sync", "blue", start);
        event.id = Some(EventId(17));
        event.reminder = Some(minutes);
        event
    }

    #[test]
    fn test_due_window_is_half_open_minute() {
        let start = at(2024, 1, 1, 10, 0);
        let event = reminded(start, 30);

        assert!(is_due(&event, start - Duration::minutes(30)));
        assert!(is_due(&event, start - Duration::minutes(30) + Duration::seconds(59)));
        assert!(!is_due(&event, start - Duration::minutes(29)));
        assert!(!is_due(&event, start - Duration::minutes(31)));
        assert!(!is_due(&event, start - Duration::minutes(28)));
    }

    #[test]
    fn test_no_reminder_or_already_shown_is_never_due() {
        let start = at(2024, 1, 1, 10, 0);
        let mut zero = reminded(start, 0);
        assert!(!is_due(&zero, start));
        zero.reminder = None;
        assert!(!is_due(&zero, start));

        let mut shown = reminded(start, 10);
        shown.reminder_shown = true;
        assert!(!is_due(&shown, start - Duration::minutes(10)));
    }

    #[test]
    fn test_notification_uses_description_or_start_time() {
        let mut event = reminded(at(2024, 1, 1, 9, 5), 15);

        let n = ReminderNotification::for_event(&event, DEFAULT_ICON);
        assert_eq!(n.title, "Reminder: Team sync");
        assert_eq!(n.body, "Event starts at 9:05 AM");
        assert_eq!(n.tag, "reminder-17");
        assert_eq!(n.icon, "logo192.png");

        event.description = Some("Bring notes".to_string());
        let n = ReminderNotification::for_event(&event, DEFAULT_ICON);
        assert_eq!(n.body, "Bring notes");
    }

    #[test]
    fn test_format_clock_time_afternoon() {
        assert_eq!(format_clock_time(at(2024, 1, 1, 15, 30)), "3:30 PM");
        assert_eq!(format_clock_time(at(2024, 1, 1, 0, 0)), "12:00 AM");
    }

    #[test]
    fn test_tick_notifies_due_events_only() {
        let start = at(2024, 1, 1, 10, 0);
        let events = vec![
            reminded(start, 30),
            reminded(start, 60),
            CalendarEvent::new("No reminder", "red", start),
        ];
        let notifier = Arc::new(RecordingNotifier::new());
        let clock = Arc::new(ManualClock::new(at(2024, 1, 1, 9, 30)));
        let scheduler = ReminderScheduler::new(Arc::new(events), notifier.clone(), clock.clone());

        let sent = scheduler.tick();

        assert_eq!(sent.len(), 1);
        assert_eq!(notifier.shown(), sent);

        clock.advance(Duration::minutes(1));
        assert!(scheduler.tick().is_empty());
    }

    #[test]
    fn test_recurring_series_reminded_only_at_stored_start() {
        use crate::event::{Frequency, RecurrenceRule};
        use std::num::NonZeroU32;

        let mut event = reminded(at(2024, 1, 1, 10, 0), 30);
        event.recurrence = Some(RecurrenceRule::new(Frequency::Daily, NonZeroU32::MIN));
        let notifier = Arc::new(RecordingNotifier::new());
        let clock = Arc::new(ManualClock::new(at(2024, 1, 2, 9, 30)));
        let scheduler = ReminderScheduler::new(Arc::new(vec![event]), notifier.clone(), clock);

        assert!(scheduler.tick().is_empty());
    }

    /// Panics on the first notification, records the rest.
    #[derive(Default)]
    struct PanicsOnceNotifier {
        panicked: AtomicBool,
        inner: RecordingNotifier,
    }

    impl Notifier for PanicsOnceNotifier {
        fn show(&self, notification: &ReminderNotification) -> PlannerResult<()> {
            if !self.panicked.swap(true, Ordering::SeqCst) {
                panic!("notification surface crashed");
            }
            self.inner.show(notification)
        }
    }

    #[test]
    fn test_tick_recovers_after_notifier_panic() {
        let start = at(2024, 1, 1, 10, 0);
        let notifier = Arc::new(PanicsOnceNotifier::default());
        let clock = Arc::new(ManualClock::new(at(2024, 1, 1, 9, 30)));
        let scheduler =
            ReminderScheduler::new(Arc::new(vec![reminded(start, 30)]), notifier.clone(), clock);

        let crashed = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| scheduler.tick()));
        assert!(crashed.is_err());

        let sent = scheduler.tick();
        assert_eq!(sent.len(), 1);
        assert_eq!(notifier.inner.shown(), sent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_scheduler_ticks_and_stops() {
        let start = at(2024, 1, 1, 10, 0);
        let notifier = Arc::new(RecordingNotifier::new());
        let clock = Arc::new(ManualClock::new(at(2024, 1, 1, 9, 29)));
        let scheduler = ReminderScheduler::new(
            Arc::new(vec![reminded(start, 30)]),
            notifier.clone(),
            clock.clone(),
        );

        let handle = scheduler.spawn(TICK_PERIOD);
        assert!(handle.is_running());

        // First period: not due yet
        tokio::time::sleep(TICK_PERIOD + StdDuration::from_millis(10)).await;
        assert!(notifier.shown().is_empty());

        // Second period: due
        clock.advance(Duration::minutes(1));
        tokio::time::sleep(TICK_PERIOD).await;
        assert_eq!(notifier.shown().len(), 1);

        handle.shutdown().await;

        // No ticks after shutdown, even when another event would be due
        clock.advance(Duration::minutes(1));
        tokio::time::sleep(TICK_PERIOD * 3).await;
        assert_eq!(notifier.shown().len(), 1);
    }
}
