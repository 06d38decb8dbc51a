//! The canonical event collection.
//!
//! Every change goes through `EventStore::dispatch`, which applies one
//! `StoreAction` with the pure `apply` reducer, bumps the revision and
//! writes the normalized collection through `Storage`. The write is
//! fire-and-forget: a failure is logged and the in-memory change stands.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::event::{CalendarEvent, EventId};
use crate::storage::Storage;

/// Key the collection is persisted under.
pub const STORAGE_KEY: &str = "savedEvents";

/// The three ways the canonical collection can change.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreAction {
    /// Append a normalized copy
    Push(CalendarEvent),
    /// Replace the event with the same id; no-op if there is none
    Update(CalendarEvent),
    /// Remove the event with the same id; no-op if there is none
    Delete(CalendarEvent),
}

/// Apply `action` to `events`, returning the new collection.
pub fn apply(events: &[CalendarEvent], action: &StoreAction) -> Vec<CalendarEvent> {
    match action {
        StoreAction::Push(event) => {
            let mut next = events.to_vec();
            next.push(event.clone().normalize());
            next
        }
        StoreAction::Update(event) => events
            .iter()
            .map(|existing| {
                if event.id.is_some() && existing.id == event.id {
                    event.clone().normalize()
                } else {
                    existing.clone()
                }
            })
            .collect(),
        StoreAction::Delete(event) => events
            .iter()
            .filter(|existing| event.id.is_none() || existing.id != event.id)
            .cloned()
            .collect(),
    }
}

/// Parse a persisted collection.
///
/// Absent or malformed data yields an empty collection; an element that
/// cannot be read as an event is skipped. Every element is normalized.
pub fn parse_events(raw: Option<&str>) -> Vec<CalendarEvent> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(e) => {
            warn!("Ignoring malformed saved events: {}", e);
            return Vec::new();
        }
    };

    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<CalendarEvent>(value) {
            Ok(event) => Some(event.normalize()),
            Err(e) => {
                warn!("Skipping unreadable saved event: {}", e);
                None
            }
        })
        .collect()
}

/// Hands out ids derived from the current instant.
///
/// Two ids requested within the same millisecond still differ: the second
/// is bumped past the first. Ids are strictly increasing, so once `i64::MAX`
/// has been handed out or observed there are none left.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// A generator that never returns an id at or below any of `events`' ids.
    pub fn after(events: &[CalendarEvent]) -> Self {
        let last = events
            .iter()
            .filter_map(|e| e.id)
            .map(|id| id.0)
            .max()
            .unwrap_or(0);
        IdGenerator { last }
    }

    /// Record an id assigned elsewhere so it is never handed out.
    pub fn observe(&mut self, id: EventId) {
        self.last = self.last.max(id.0);
    }

    pub fn next(&mut self, clock: &dyn Clock) -> Option<EventId> {
        let candidate = clock.now().and_utc().timestamp_millis();
        self.last = candidate.max(self.last.checked_add(1)?);
        Some(EventId(self.last))
    }
}

pub struct EventStore<S: Storage> {
    storage: S,
    clock: Arc<dyn Clock>,
    ids: IdGenerator,
    events: Vec<CalendarEvent>,
    revision: u64,
}

impl<S: Storage> EventStore<S> {
    /// Load the persisted collection from `storage`.
    ///
    /// Events saved without an id, or with an id an earlier event already
    /// uses, are given a fresh one here so they can be updated and deleted
    /// like any other.
    pub fn load(storage: S, clock: Arc<dyn Clock>) -> Self {
        let raw = storage.get(STORAGE_KEY).unwrap_or_else(|e| {
            warn!("Could not read saved events: {}", e);
            None
        });

        let mut events = parse_events(raw.as_deref());
        let mut seen = HashSet::new();
        for event in events.iter_mut() {
            if let Some(id) = event.id.filter(|id| !seen.insert(*id)) {
                warn!("Duplicate saved event id {}; assigning a new one", id);
                event.id = None;
            }
        }

        let mut ids = IdGenerator::after(&events);
        for event in events.iter_mut().filter(|e| e.id.is_none()) {
            event.id = ids.next(clock.as_ref());
            if event.id.is_none() {
                warn!("No event ids left for saved event '{}'", event.title);
            }
        }

        info!("Loaded {} events", events.len());

        EventStore {
            storage,
            clock,
            ids,
            events,
            revision: 0,
        }
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    /// Incremented on every change to the collection; usable as a cache key.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn find(&self, id: EventId) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == Some(id))
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Apply one action.
    ///
    /// A pushed event gets a fresh id when it has none or when its id is
    /// already used by another event in the store.
    ///
    /// Returns the id the action targeted, if any.
    pub fn dispatch(&mut self, action: StoreAction) -> Option<EventId> {
        let action = match action {
            StoreAction::Push(mut event) => {
                if let Some(id) = event.id.filter(|id| self.find(*id).is_some()) {
                    warn!("Event id {} is already in use; assigning a new one", id);
                    event.id = None;
                }

                match event.id {
                    Some(id) => self.ids.observe(id),
                    None => {
                        let Some(id) = self.ids.next(self.clock.as_ref()) else {
                            warn!("No event ids left; '{}' was not added", event.title);
                            return None;
                        };
                        event.id = Some(id);
                    }
                }
                StoreAction::Push(event)
            }
            other => other,
        };

        let target = match &action {
            StoreAction::Push(e) | StoreAction::Update(e) | StoreAction::Delete(e) => e.id,
        };

        let next = apply(&self.events, &action);
        if next == self.events {
            debug!("No change for {} on event {:?}", action_name(&action), target);
            return target;
        }

        self.events = next;
        self.revision += 1;
        debug!(
            "Applied {} to event {:?} (revision {})",
            action_name(&action),
            target,
            self.revision
        );

        self.persist();
        target
    }

    pub fn push(&mut self, event: CalendarEvent) -> Option<EventId> {
        self.dispatch(StoreAction::Push(event))
    }

    pub fn update(&mut self, event: CalendarEvent) {
        self.dispatch(StoreAction::Update(event));
    }

    pub fn delete(&mut self, event: CalendarEvent) {
        self.dispatch(StoreAction::Delete(event));
    }

    fn persist(&self) {
        let normalized: Vec<CalendarEvent> =
            self.events.iter().cloned().map(CalendarEvent::normalize).collect();

        let json = match serde_json::to_string(&normalized) {
            Ok(json) => json,
            Err(e) => {
                warn!("Could not serialize events: {}", e);
                return;
            }
        };

        if let Err(e) = self.storage.set(STORAGE_KEY, &json) {
            warn!("Could not save events: {}", e);
        }
    }
}

fn action_name(action: &StoreAction) -> &'static str {
    match action {
        StoreAction::Push(_) => "push",
        StoreAction::Update(_) => "update",
        StoreAction::Delete(_) => "delete",
    }
}

/// Read access to the canonical events, for consumers that outlive a borrow
/// of the store (the reminder scheduler's timer task).
pub trait EventSource: Send + Sync + 'static {
    fn canonical_events(&self) -> Vec<CalendarEvent>;
}

impl<S: Storage + 'static> EventSource for RwLock<EventStore<S>> {
    fn canonical_events(&self) -> Vec<CalendarEvent> {
        match self.read() {
            Ok(store) => store.events().to_vec(),
            Err(poisoned) => poisoned.into_inner().events().to_vec(),
        }
    }
}

impl EventSource for Vec<CalendarEvent> {
    fn canonical_events(&self) -> Vec<CalendarEvent> {
        self.clone()
    }
}
