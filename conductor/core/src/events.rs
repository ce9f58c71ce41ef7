//! Surface Events
//!
//! Events sent from UI surfaces to the Conductor. Surfaces report what the
//! user did; the Conductor decides what it means.

use serde::{Deserialize, Serialize};

use crate::input::Field;
use crate::messages::EventId;

/// Events from UI Surface to Conductor
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SurfaceEvent {
    /// Surface connected to Conductor
    Connected {
        /// Event ID for acknowledgment
        event_id: EventId,
        /// Surface type identifier
        surface_type: SurfaceType,
    },

    /// A field value changed (every keystroke or selector change)
    FieldEdited {
        /// Which field
        field: Field,
        /// Full new value
        value: String,
    },

    /// User pressed Generate
    GenerateRequested {
        /// Event ID for acknowledgment
        event_id: EventId,
    },

    /// User asked to stop the running generation
    CancelRequested {
        /// Event ID for acknowledgment
        event_id: EventId,
    },

    /// User requested quit
    QuitRequested {
        /// Event ID for acknowledgment
        event_id: EventId,
    },
}

impl SurfaceEvent {
    /// Generate a new event ID for this event
    pub fn new_event_id() -> EventId {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        EventId(format!("evt_{id}"))
    }

    /// Get the event ID if this event has one
    pub fn event_id(&self) -> Option<&EventId> {
        match self {
            Self::Connected { event_id, .. }
            | Self::GenerateRequested { event_id }
            | Self::CancelRequested { event_id }
            | Self::QuitRequested { event_id } => Some(event_id),
            Self::FieldEdited { .. } => None,
        }
    }
}

/// Type of UI surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceType {
    /// Terminal UI
    Tui,
    /// Non-interactive command line run
    Headless,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_ids_unique() {
        let a = SurfaceEvent::new_event_id();
        let b = SurfaceEvent::new_event_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_field_edit_has_no_event_id() {
        let event = SurfaceEvent::FieldEdited {
            field: Field::Company,
            value: "Acme".to_string(),
        };
        assert!(event.event_id().is_none());

        let event_id = SurfaceEvent::new_event_id();
        let event = SurfaceEvent::GenerateRequested {
            event_id: event_id.clone(),
        };
        assert_eq!(event.event_id(), Some(&event_id));
    }
}
