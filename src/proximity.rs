//! Proximity event processing.
//!
//! A fetched body is normalized (see [`crate::payload`]) into an ordered
//! batch, each event is deduplicated against the [`EventCursor`], and the
//! survivors are classified into occupancy [`Transition`]s.  The caller
//! applies the transitions; nothing here touches occupancy directly.

use core::fmt;

use log::{debug, info};

use crate::error::DecodeError;
use crate::payload::{self, RawEvent};

// ───────────────────────────────────────────────────────────────
// Events
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Enter,
    Exit,
    Unknown,
}

impl EventKind {
    pub fn classify(event_type: &str) -> Self {
        match event_type {
            "enter" => Self::Enter,
            "exit" => Self::Exit,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Enter => "enter",
            Self::Exit => "exit",
            Self::Unknown => "unknown",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProximityEvent {
    pub id: String,
    pub kind: EventKind,
    /// Raw `event_type`, kept for logging unknown kinds.
    pub event_type: String,
    pub location_name: String,
    /// Present only when the backend reported a positive distance.
    pub distance_meters: Option<f32>,
    pub created_at: Option<String>,
}

impl From<RawEvent> for ProximityEvent {
    fn from(raw: RawEvent) -> Self {
        let id = if raw.event_id.is_empty() { raw.id } else { raw.event_id };
        let location_name = if raw.home_location_name.is_empty() {
            raw.location_name
        } else {
            raw.home_location_name
        };
        Self {
            id,
            kind: EventKind::classify(&raw.event_type),
            event_type: raw.event_type,
            location_name,
            distance_meters: (raw.distance > 0.0).then_some(raw.distance),
            created_at: (!raw.created_at.is_empty()).then_some(raw.created_at),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Cursor
// ───────────────────────────────────────────────────────────────

/// Id of the last processed event.
///
/// This is a last-id cursor, not a history: only the immediately
/// preceding id is suppressed.  It starts empty, so an event whose id
/// is empty is never processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCursor(String);

impl EventCursor {
    pub fn last_id(&self) -> &str {
        &self.0
    }

    /// Record `id` as processed.  Returns `false` when it equals the
    /// current cursor (duplicate, nothing changes).
    pub fn advance(&mut self, id: &str) -> bool {
        if self.0 == id {
            return false;
        }
        id.clone_into(&mut self.0);
        true
    }
}

// ───────────────────────────────────────────────────────────────
// Processing
// ───────────────────────────────────────────────────────────────

/// An occupancy change decided by a fresh event.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Entered(ProximityEvent),
    Exited(ProximityEvent),
}

impl Transition {
    pub fn event(&self) -> &ProximityEvent {
        match self {
            Self::Entered(e) | Self::Exited(e) => e,
        }
    }

    pub fn occupied(&self) -> bool {
        matches!(self, Self::Entered(_))
    }
}

/// Decode `body` and run every event through the cursor.
///
/// On a decode error the cursor is left untouched.  Unknown event types
/// still advance the cursor but produce no transition.
pub fn process_payload(body: &str, cursor: &mut EventCursor) -> Result<Vec<Transition>, DecodeError> {
    let (shape, batch) = payload::normalize_events(body)?;
    if batch.is_empty() {
        debug!("PROXIMITY | no events");
        return Ok(Vec::new());
    }
    debug!("PROXIMITY | {} event(s) in {shape:?} payload", batch.len());

    let mut transitions = Vec::new();
    for raw in batch {
        let event = ProximityEvent::from(raw);
        if !cursor.advance(&event.id) {
            continue;
        }
        log_new_event(&event);
        match event.kind {
            EventKind::Enter => transitions.push(Transition::Entered(event)),
            EventKind::Exit => transitions.push(Transition::Exited(event)),
            EventKind::Unknown => {
                debug!("PROXIMITY | ignoring event type '{}'", event.event_type);
            }
        }
    }
    Ok(transitions)
}

fn log_new_event(event: &ProximityEvent) {
    info!("=== new proximity event ===");
    info!("  id:       {}", event.id);
    info!("  type:     {}", event.event_type);
    info!("  location: {}", event.location_name);
    if let Some(distance) = event.distance_meters {
        info!("  distance: {distance:.2} m");
    }
    if let Some(created_at) = &event.created_at {
        info!("  at:       {created_at}");
    }
}
