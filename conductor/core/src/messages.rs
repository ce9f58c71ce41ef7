//! Conductor Messages
//!
//! Messages sent from the Conductor to UI surfaces. A surface holds no
//! generation logic of its own: it renders the form, the per-field errors and
//! the three output channels exactly as these messages describe them.

use serde::{Deserialize, Serialize};

use crate::emission::{Channel, SequenceOutcome};
use crate::input::PitchInput;
use crate::template::PitchDraft;
use crate::validation::ValidationResult;

/// Messages from Conductor to UI Surface
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ConductorMessage {
    // ============================================
    // Form Messages
    // ============================================
    /// Current form values (sent on connect)
    FormSnapshot {
        /// The form values
        input: PitchInput,
    },

    /// Generation refused: one or more fields are blank
    ValidationFailed {
        /// Per-field messages
        errors: ValidationResult,
    },

    // ============================================
    // Generation Messages
    // ============================================
    /// All three output channels were reset to empty
    ChannelsCleared,

    /// A new session started streaming
    GenerationStarted {
        /// The new session
        session_id: SessionId,
    },

    /// A token to append to a channel
    Token {
        /// Session that produced the token
        session_id: SessionId,
        /// Destination channel
        channel: Channel,
        /// Word plus trailing space
        text: String,
    },

    /// A session reached a terminal state
    StreamEnd {
        /// Session that ended
        session_id: SessionId,
        /// Completed or cancelled
        outcome: SequenceOutcome,
        /// Channel contents at the end of the session
        draft: PitchDraft,
    },

    // ============================================
    // System Messages
    // ============================================
    /// System notification
    Notify {
        /// Notification level
        level: NotifyLevel,
        /// Message content
        message: String,
    },

    /// Conductor state change
    State {
        /// The new state
        state: ConductorState,
    },

    /// Acknowledgment of received event
    Ack {
        /// Event ID being acknowledged
        event_id: EventId,
    },

    /// Request surface to quit
    Quit,
}

/// Generation session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a new unique session ID
    #[must_use]
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        Self(format!("gen_{id}"))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Event identifier (for acknowledgments)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

/// Notification level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Something unexpected but recoverable
    Warning,
    /// Something failed
    Error,
}

/// Conductor operational state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConductorState {
    /// Idle, the Generate action is available
    #[default]
    Ready,
    /// A session is streaming; Generate is disabled
    Streaming,
    /// Shutting down
    ShuttingDown,
}

impl ConductorState {
    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Streaming => "Generating…",
            Self::ShuttingDown => "Shutting down...",
        }
    }

    /// Whether a generation is in flight
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Streaming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_unique() {
        let id1 = SessionId::new();
        let id2 = SessionId::new();
        assert_ne!(id1, id2);
        assert!(id1.0.starts_with("gen_"));
    }

    #[test]
    fn test_conductor_state_description() {
        assert_eq!(ConductorState::Ready.description(), "Ready");
        assert_eq!(ConductorState::Streaming.description(), "Generating…");
        assert!(ConductorState::Streaming.is_busy());
        assert!(!ConductorState::Ready.is_busy());
    }

    #[test]
    fn test_token_message_serializes() {
        let msg = ConductorMessage::Token {
            session_id: SessionId("gen_7".to_string()),
            channel: Channel::Subhead,
            text: "deal ".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"subhead\""));
        let back: ConductorMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
