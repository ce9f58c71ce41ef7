//! Display State Types
//!
//! Types that represent the current display state for the TUI.
//! These are derived from ConductorMessages and used for rendering.
//!
//! # Design Philosophy
//!
//! The TUI is a "thin client" - it just renders what the Conductor tells it to.
//! Display state is the bridge between ConductorMessages and rendering.
//!
//! - Output panels: the three channels as streamed so far
//! - Field errors: inline messages under blank fields
//! - Status: busy flag, last outcome, pending notification

use std::time::Duration;

use pitch_conductor::{
    ConductorMessage, ConductorState, Field, NotifyLevel, PitchDraft, PitchInput,
    SequenceOutcome, SessionId, ValidationResult,
};

/// How long a notification stays on the status line
const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// A notification to display
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayNotification {
    /// Notification level
    pub level: NotifyLevel,
    /// Message content
    pub message: String,
    /// Time left before it disappears
    pub remaining: Duration,
}

/// The full display state for the TUI
#[derive(Debug, Default)]
pub struct DisplayState {
    /// Output channels as shown
    pub channels: PitchDraft,
    /// Per-field validation messages from the last request
    pub errors: ValidationResult,
    /// Session whose tokens are being shown
    pub session_id: Option<SessionId>,
    /// How the last session ended
    pub last_outcome: Option<SequenceOutcome>,
    /// Conductor state
    pub conductor_state: ConductorState,
    /// Form values sent on connect, waiting to be loaded into the form
    pub pending_form: Option<PitchInput>,
    /// Pending notification (if any)
    pub notification: Option<DisplayNotification>,
    /// Conductor asked us to quit
    pub quit_requested: bool,
}

impl DisplayState {
    /// Create a new display state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a ConductorMessage to update display state
    pub fn apply_message(&mut self, msg: ConductorMessage) {
        match msg {
            // Form messages
            ConductorMessage::FormSnapshot { input } => {
                self.pending_form = Some(input);
            }
            ConductorMessage::ValidationFailed { errors } => {
                self.errors = errors;
            }

            // Generation messages
            ConductorMessage::ChannelsCleared => {
                self.channels.clear();
                self.last_outcome = None;
            }
            ConductorMessage::GenerationStarted { session_id } => {
                self.errors = ValidationResult::default();
                self.session_id = Some(session_id);
            }
            ConductorMessage::Token {
                session_id,
                channel,
                text,
            } => {
                // Only the session we were told about may write
                if self.session_id.as_ref() == Some(&session_id) {
                    self.channels.section_mut(channel).push_str(&text);
                } else {
                    tracing::debug!(session_id = %session_id, "Ignoring token for old session");
                }
            }
            ConductorMessage::StreamEnd {
                session_id,
                outcome,
                draft,
            } => {
                if self.session_id.as_ref() == Some(&session_id) {
                    if outcome == SequenceOutcome::Completed {
                        self.channels = draft;
                    }
                    self.session_id = None;
                }
                self.last_outcome = Some(outcome);
            }

            // System messages
            ConductorMessage::State { state } => {
                self.conductor_state = state;
            }
            ConductorMessage::Notify { level, message } => {
                self.notification = Some(DisplayNotification {
                    level,
                    message,
                    remaining: NOTIFICATION_TTL,
                });
            }
            ConductorMessage::Quit => {
                self.quit_requested = true;
            }
            ConductorMessage::Ack { .. } => {
                // No display state change needed
            }
        }
    }

    /// Update timers
    pub fn update(&mut self, delta: Duration) {
        if let Some(notification) = self.notification.as_mut() {
            notification.remaining = notification.remaining.saturating_sub(delta);
            if notification.remaining.is_zero() {
                self.notification = None;
            }
        }
    }

    /// Inline error for a field
    pub fn error_for(&self, field: Field) -> Option<&str> {
        self.errors.get(field)
    }

    /// Check if currently streaming
    pub fn is_streaming(&self) -> bool {
        self.conductor_state.is_busy()
    }

    /// Clear the notification
    pub fn clear_notification(&mut self) {
        self.notification = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitch_conductor::{validate, Channel};
    use pretty_assertions::assert_eq;

    fn sid(n: u32) -> SessionId {
        SessionId(format!("gen_{n}"))
    }

    fn token(n: u32, channel: Channel, text: &str) -> ConductorMessage {
        ConductorMessage::Token {
            session_id: sid(n),
            channel,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_tokens_append_to_their_channel() {
        let mut display = DisplayState::new();
        display.apply_message(ConductorMessage::GenerationStarted { session_id: sid(1) });
        display.apply_message(token(1, Channel::Headline, "Acme: "));
        display.apply_message(token(1, Channel::Subhead, "we "));
        display.apply_message(token(1, Channel::Headline, "a "));

        assert_eq!(display.channels.headline, "Acme: a ");
        assert_eq!(display.channels.subhead, "we ");
        assert!(display.channels.body.is_empty());
    }

    #[test]
    fn test_tokens_from_other_sessions_are_ignored() {
        let mut display = DisplayState::new();
        display.apply_message(ConductorMessage::GenerationStarted { session_id: sid(2) });
        display.apply_message(token(1, Channel::Body, "stale "));
        assert!(display.channels.is_empty());
    }

    #[test]
    fn test_completed_stream_end_replaces_channels() {
        let mut display = DisplayState::new();
        display.apply_message(ConductorMessage::GenerationStarted { session_id: sid(3) });
        display.apply_message(token(3, Channel::Headline, "Acme: "));

        let draft = PitchDraft {
            headline: "Acme:".to_string(),
            subhead: "we".to_string(),
            body: "at".to_string(),
        };
        display.apply_message(ConductorMessage::StreamEnd {
            session_id: sid(3),
            outcome: SequenceOutcome::Completed,
            draft: draft.clone(),
        });
        assert_eq!(display.channels, draft);
        assert!(display.session_id.is_none());
        assert_eq!(display.last_outcome, Some(SequenceOutcome::Completed));
    }

    #[test]
    fn test_cancelled_stream_keeps_partial_text() {
        let mut display = DisplayState::new();
        display.apply_message(ConductorMessage::GenerationStarted { session_id: sid(4) });
        display.apply_message(token(4, Channel::Headline, "Acme: "));
        display.apply_message(ConductorMessage::StreamEnd {
            session_id: sid(4),
            outcome: SequenceOutcome::Cancelled,
            draft: PitchDraft::default(),
        });
        assert_eq!(display.channels.headline, "Acme: ");
    }

    #[test]
    fn test_validation_errors_shown_until_next_start() {
        let mut display = DisplayState::new();
        display.apply_message(ConductorMessage::ValidationFailed {
            errors: validate(&PitchInput::default()),
        });
        assert_eq!(display.error_for(Field::Company), Some("company is required."));
        assert_eq!(display.error_for(Field::Tone), None);

        display.apply_message(ConductorMessage::GenerationStarted { session_id: sid(5) });
        assert!(display.error_for(Field::Company).is_none());
    }

    #[test]
    fn test_channels_cleared() {
        let mut display = DisplayState::new();
        display.channels.body = "old".to_string();
        display.apply_message(ConductorMessage::ChannelsCleared);
        assert!(display.channels.is_empty());
    }

    #[test]
    fn test_state_and_quit() {
        let mut display = DisplayState::new();
        display.apply_message(ConductorMessage::State {
            state: ConductorState::Streaming,
        });
        assert!(display.is_streaming());

        display.apply_message(ConductorMessage::Quit);
        assert!(display.quit_requested);
    }

    #[test]
    fn test_notification_expires() {
        let mut display = DisplayState::new();
        display.apply_message(ConductorMessage::Notify {
            level: NotifyLevel::Warning,
            message: "Generation stopped unexpectedly".to_string(),
        });
        display.update(Duration::from_secs(1));
        assert!(display.notification.is_some());
        display.update(NOTIFICATION_TTL);
        assert!(display.notification.is_none());
    }
}
