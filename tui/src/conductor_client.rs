//! Conductor Client
//!
//! Thin wrapper around the Conductor for TUI integration.
//! This client embeds the Conductor directly (no network) and provides
//! a convenient interface for sending events and receiving messages.
//!
//! # Architecture
//!
//! The TUI is a "thin client" - it doesn't contain any business logic.
//! All orchestration happens in the Conductor. The TUI's job is:
//! 1. Convert terminal events to SurfaceEvents
//! 2. Send SurfaceEvents to Conductor
//! 3. Receive ConductorMessages
//! 4. Render display state based on messages

use tokio::sync::mpsc;

use pitch_conductor::{
    Conductor, ConductorMessage, ConductorState, Field, PitchConfig, SurfaceEvent, SurfaceType,
    TemplateBackend, SURFACE_BURST,
};

/// Client for communicating with the embedded Conductor
pub struct ConductorClient {
    /// The embedded Conductor instance
    conductor: Conductor<TemplateBackend>,
    /// Receiver for messages from Conductor
    rx: mpsc::Receiver<ConductorMessage>,
}

impl ConductorClient {
    /// Create a new ConductorClient with embedded Conductor
    pub fn new(config: PitchConfig) -> Self {
        // Every token becomes a message, so the surface channel needs headroom
        // for a whole frame's worth. It is drained on this task, so it must
        // also fit the largest burst a single event produces.
        let capacity = (config.channel_capacity * 4).max(SURFACE_BURST);
        let (tx, rx) = mpsc::channel(capacity);
        let conductor = Conductor::with_template(config, tx);
        Self { conductor, rx }
    }

    /// Connect this surface to the Conductor
    pub async fn connect(&mut self) -> anyhow::Result<()> {
        let event = SurfaceEvent::Connected {
            event_id: SurfaceEvent::new_event_id(),
            surface_type: SurfaceType::Tui,
        };
        self.conductor.handle_event(event).await
    }

    /// Report a field's new value
    pub async fn edit_field(&mut self, field: Field, value: String) -> anyhow::Result<()> {
        self.conductor
            .handle_event(SurfaceEvent::FieldEdited { field, value })
            .await
    }

    /// Ask for a generation
    pub async fn generate(&mut self) -> anyhow::Result<()> {
        let event = SurfaceEvent::GenerateRequested {
            event_id: SurfaceEvent::new_event_id(),
        };
        self.conductor.handle_event(event).await
    }

    /// Stop the running generation
    pub async fn cancel(&mut self) -> anyhow::Result<()> {
        let event = SurfaceEvent::CancelRequested {
            event_id: SurfaceEvent::new_event_id(),
        };
        self.conductor.handle_event(event).await
    }

    /// Notify Conductor that user wants to quit
    pub async fn request_quit(&mut self) -> anyhow::Result<()> {
        let event = SurfaceEvent::QuitRequested {
            event_id: SurfaceEvent::new_event_id(),
        };
        self.conductor.handle_event(event).await
    }

    /// Poll for streaming tokens (must be called regularly)
    pub async fn poll_streaming(&mut self) -> bool {
        self.conductor.poll_streaming().await
    }

    /// Receive all pending messages from the Conductor (non-blocking)
    pub fn recv_all(&mut self) -> Vec<ConductorMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Get the current Conductor state
    pub fn state(&self) -> ConductorState {
        self.conductor.state()
    }

    /// Whether a generation is running
    pub fn is_busy(&self) -> bool {
        self.conductor.is_busy()
    }
}
