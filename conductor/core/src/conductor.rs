//! Conductor - The Orchestration Core
//!
//! The Conductor owns the form values, the three output channels and the
//! single active generation session. It turns surface events into validated
//! generation runs and forwards every streamed token to the surface.
//!
//! # Design Philosophy
//!
//! The Conductor is UI-agnostic. It doesn't know whether it's talking to the
//! TUI, a headless command line run, or a test harness. It communicates through:
//! - `ConductorMessage`: Commands sent TO the UI surface
//! - `SurfaceEvent`: Events received FROM the UI surface
//!
//! Only one session streams at a time. A new request cancels the running one
//! before starting (last request wins); nothing is queued or merged.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use thiserror::Error;

use crate::backend::{GenerationBackend, TemplateBackend};
use crate::config::PitchConfig;
use crate::emission::{Channel, EmissionEvent, SequenceOutcome};
use crate::events::{SurfaceEvent, SurfaceType};
use crate::input::{Field, PitchInput};
use crate::messages::{ConductorMessage, ConductorState, EventId, NotifyLevel, SessionId};
use crate::session::GenerationSession;
use crate::template::PitchDraft;
use crate::validation::{validate, ValidationResult};

/// Most messages a single surface event can produce
///
/// A generate request yields `Ack`, `ChannelsCleared`, `StreamEnd` for the
/// superseded session, `GenerationStarted` and `State`. Surfaces that drain
/// their channel on the same task as the Conductor need at least this much
/// capacity.
pub const SURFACE_BURST: usize = 5;

/// Most messages the end of a stream produces (`StreamEnd`, `Notify`, `State`)
const STREAM_END_MESSAGES: usize = 3;

/// Why a generation request did not start
#[derive(Debug, Error)]
pub enum GenerateError {
    /// One or more fields were blank
    #[error("validation failed: {0}")]
    Validation(ValidationResult),
}

/// The Conductor - headless orchestration core
pub struct Conductor<B: GenerationBackend> {
    /// Resolved configuration
    config: PitchConfig,
    /// Token producer
    backend: B,
    /// Current form values
    input: PitchInput,
    /// Output channel accumulators
    channels: PitchDraft,
    /// Current operational state
    state: ConductorState,
    /// Channel to send messages to UI surface
    tx: mpsc::Sender<ConductorMessage>,
    /// Connected surface
    surface_type: Option<SurfaceType>,
    /// Active generation, if any
    session: Option<GenerationSession>,
    /// Event stream of the active session, tagged with its id
    streaming_rx: Option<(SessionId, mpsc::Receiver<EmissionEvent>)>,
}

impl Conductor<TemplateBackend> {
    /// Create a Conductor backed by the template emitter described by `config`
    #[must_use]
    pub fn with_template(config: PitchConfig, tx: mpsc::Sender<ConductorMessage>) -> Self {
        let backend = TemplateBackend::new(config.pacing, config.channel_capacity);
        Self::new(backend, config, tx)
    }
}

impl<B: GenerationBackend> Conductor<B> {
    /// Create a new Conductor with the given backend
    pub fn new(backend: B, config: PitchConfig, tx: mpsc::Sender<ConductorMessage>) -> Self {
        let input = PitchInput::with_tone(config.default_tone);
        Self {
            config,
            backend,
            input,
            channels: PitchDraft::default(),
            state: ConductorState::Ready,
            tx,
            surface_type: None,
            session: None,
            streaming_rx: None,
        }
    }

    /// Get current state
    pub fn state(&self) -> ConductorState {
        self.state
    }

    /// Whether a generation is in flight
    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// Current form values
    pub fn input(&self) -> &PitchInput {
        &self.input
    }

    /// Current output channel contents
    pub fn channels(&self) -> &PitchDraft {
        &self.channels
    }

    /// Active configuration
    pub fn config(&self) -> &PitchConfig {
        &self.config
    }

    /// Connected surface, if any
    pub fn surface_type(&self) -> Option<SurfaceType> {
        self.surface_type
    }

    /// Id of the active session, if any
    pub fn active_session(&self) -> Option<&SessionId> {
        self.session.as_ref().map(GenerationSession::id)
    }

    /// Replace a form value directly (headless callers)
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.input.set(field, value);
    }

    /// Handle an event from the UI surface
    pub async fn handle_event(&mut self, event: SurfaceEvent) -> anyhow::Result<()> {
        match event {
            SurfaceEvent::Connected {
                event_id,
                surface_type,
            } => {
                tracing::debug!(surface = ?surface_type, "Surface connected");
                self.surface_type = Some(surface_type);
                self.ack(event_id).await;

                // Send current state to new surface
                self.send(ConductorMessage::State { state: self.state })
                    .await;
                self.send(ConductorMessage::FormSnapshot {
                    input: self.input.clone(),
                })
                .await;
            }

            SurfaceEvent::FieldEdited { field, value } => {
                tracing::trace!(field = %field, len = value.len(), "Field edited");
                self.input.set(field, value);
            }

            SurfaceEvent::GenerateRequested { event_id } => {
                self.ack(event_id).await;
                if let Err(e) = self.generate().await {
                    tracing::info!(error = %e, "Generation not started");
                }
            }

            SurfaceEvent::CancelRequested { event_id } => {
                self.ack(event_id).await;
                if self.cancel_active().await {
                    self.set_state(ConductorState::Ready).await;
                }
            }

            SurfaceEvent::QuitRequested { event_id } => {
                self.ack(event_id).await;
                self.shutdown().await?;
            }
        }

        Ok(())
    }

    /// Start a generation from the current form values
    ///
    /// Channels are cleared first, whatever the outcome. Blank fields abort the
    /// request with [`GenerateError::Validation`] and no emission starts. A
    /// running session is cancelled before the new one begins.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Validation`] if any field is blank.
    pub async fn generate(&mut self) -> Result<SessionId, GenerateError> {
        // Keep the superseded text for that session's StreamEnd
        let previous = std::mem::take(&mut self.channels);
        self.send(ConductorMessage::ChannelsCleared).await;

        let errors = validate(&self.input);
        if !errors.is_valid() {
            tracing::debug!(fields = errors.len(), "Validation failed");
            // A stale session must not refill the channels we just cleared
            if self.end_session(SequenceOutcome::Cancelled, previous).await {
                self.set_state(ConductorState::Ready).await;
            }
            self.send(ConductorMessage::ValidationFailed {
                errors: errors.clone(),
            })
            .await;
            return Err(GenerateError::Validation(errors));
        }

        self.end_session(SequenceOutcome::Cancelled, previous).await;

        let draft = PitchDraft::compose(&self.input);
        let session = GenerationSession::new(draft);
        let session_id = session.id().clone();
        let rx = self
            .backend
            .start(session.draft(), session.cancellation_token())
            .await;

        tracing::info!(
            session_id = %session_id,
            backend = self.backend.name(),
            tone = %self.input.effective_tone(),
            "Generation started"
        );

        self.session = Some(session);
        self.streaming_rx = Some((session_id.clone(), rx));
        self.send(ConductorMessage::GenerationStarted {
            session_id: session_id.clone(),
        })
        .await;
        self.set_state(ConductorState::Streaming).await;

        Ok(session_id)
    }

    /// Cancel the running session, if any
    ///
    /// Channels keep whatever text had arrived. Returns whether a session was
    /// running. The caller decides the next state.
    pub async fn cancel_active(&mut self) -> bool {
        let partial = self.channels.clone();
        self.end_session(SequenceOutcome::Cancelled, partial).await
    }

    /// Poll for streaming tokens
    ///
    /// Call this regularly to process incoming tokens. Never blocks as long as
    /// the surface channel has room for [`SURFACE_BURST`] messages when the
    /// surface is drained: at most as many events are taken as the surface
    /// channel can currently accept. Returns true if there was activity.
    pub async fn poll_streaming(&mut self) -> bool {
        // Each event becomes one surface message, except the last, which may become three
        let budget = self.tx.capacity().saturating_sub(STREAM_END_MESSAGES - 1);

        // Collect first so the receiver borrow ends before we mutate self
        let events: Vec<Option<EmissionEvent>> = {
            let Some((_, rx)) = self.streaming_rx.as_mut() else {
                return false;
            };

            let mut collected = Vec::new();
            while collected.len() < budget {
                match rx.try_recv() {
                    Ok(event) => {
                        let is_terminal = matches!(event, EmissionEvent::Finished(_));
                        collected.push(Some(event));
                        if is_terminal {
                            break;
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        collected.push(None);
                        break;
                    }
                }
            }
            collected
        };

        if events.is_empty() {
            return false;
        }

        for event in events {
            self.apply_stream_event(event).await;
        }
        true
    }

    /// Wait until the active session (if any) has ended
    pub async fn run_to_idle(&mut self) {
        while let Some((_, rx)) = self.streaming_rx.as_mut() {
            let event = rx.recv().await;
            self.apply_stream_event(event).await;
        }
    }

    /// Shut down the Conductor
    pub async fn shutdown(&mut self) -> anyhow::Result<()> {
        self.cancel_active().await;
        self.set_state(ConductorState::ShuttingDown).await;
        self.send(ConductorMessage::Quit).await;
        Ok(())
    }

    /// Apply one event from the active stream; `None` means the producer vanished
    async fn apply_stream_event(&mut self, event: Option<EmissionEvent>) {
        let Some(stream_id) = self.streaming_rx.as_ref().map(|(id, _)| id.clone()) else {
            return;
        };

        match event {
            Some(EmissionEvent::Token(token)) => {
                let Some(session) = self.session.as_mut().filter(|s| *s.id() == stream_id) else {
                    tracing::debug!(session_id = %stream_id, "Dropping token from stale session");
                    return;
                };
                session.record_token();
                self.channels
                    .section_mut(token.channel)
                    .push_str(&token.text);
                self.send(ConductorMessage::Token {
                    session_id: stream_id,
                    channel: token.channel,
                    text: token.text,
                })
                .await;
            }

            Some(EmissionEvent::Finished(outcome)) => {
                if outcome == SequenceOutcome::Completed {
                    for channel in Channel::ALL {
                        let section = self.channels.section_mut(channel);
                        if section.ends_with(' ') {
                            section.pop();
                        }
                    }
                }
                let draft = self.channels.clone();
                self.end_session(outcome, draft).await;
                self.set_state(ConductorState::Ready).await;
            }

            None => {
                tracing::warn!(session_id = %stream_id, "Token producer stopped without finishing");
                let partial = self.channels.clone();
                self.end_session(SequenceOutcome::Cancelled, partial).await;
                self.notify(NotifyLevel::Warning, "Generation stopped unexpectedly")
                    .await;
                self.set_state(ConductorState::Ready).await;
            }
        }
    }

    /// Tear down the active session and report how it ended
    ///
    /// Returns false if no session was active.
    async fn end_session(&mut self, outcome: SequenceOutcome, draft: PitchDraft) -> bool {
        self.streaming_rx = None;
        let Some(mut session) = self.session.take() else {
            return false;
        };

        match outcome {
            SequenceOutcome::Cancelled => session.cancel(),
            SequenceOutcome::Completed => session.finish(outcome),
        }

        tracing::info!(
            session_id = %session.id(),
            outcome = ?outcome,
            tokens = session.tokens_received(),
            elapsed_ms = session.elapsed_ms(),
            "Generation ended"
        );

        self.send(ConductorMessage::StreamEnd {
            session_id: session.id().clone(),
            outcome,
            draft,
        })
        .await;
        true
    }

    /// Set state and notify UI
    async fn set_state(&mut self, state: ConductorState) {
        self.state = state;
        self.send(ConductorMessage::State { state }).await;
    }

    /// Send acknowledgment
    async fn ack(&self, event_id: EventId) {
        self.send(ConductorMessage::Ack { event_id }).await;
    }

    /// Send notification
    async fn notify(&self, level: NotifyLevel, message: &str) {
        self.send(ConductorMessage::Notify {
            level,
            message: message.to_string(),
        })
        .await;
    }

    /// Send a message to the UI surface
    async fn send(&self, msg: ConductorMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }
}
