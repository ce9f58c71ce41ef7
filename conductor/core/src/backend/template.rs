//! Template Backend
//!
//! Streams a composed draft back word by word with simulated pacing.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::traits::GenerationBackend;
use crate::emission::{drive, EmissionEvent, EmissionSequence, Pacing};
use crate::template::PitchDraft;

/// Backend that replays the draft through an [`EmissionSequence`]
#[derive(Clone, Debug)]
pub struct TemplateBackend {
    pacing: Pacing,
    channel_capacity: usize,
}

impl Default for TemplateBackend {
    fn default() -> Self {
        Self::new(Pacing::default(), 64)
    }
}

impl TemplateBackend {
    /// Create a backend with the given pacing and event buffer size
    #[must_use]
    pub fn new(pacing: Pacing, channel_capacity: usize) -> Self {
        Self {
            pacing,
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Backend with no delays between tokens
    #[must_use]
    pub fn instant() -> Self {
        Self::new(Pacing::instant(), 64)
    }
}

#[async_trait]
impl GenerationBackend for TemplateBackend {
    fn name(&self) -> &str {
        "template"
    }

    async fn start(
        &self,
        draft: &PitchDraft,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<EmissionEvent> {
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let sequence = EmissionSequence::new(draft);
        tracing::debug!(
            words = sequence.remaining(),
            pacing = ?self.pacing,
            "Starting template emission"
        );
        tokio::spawn(drive(sequence, self.pacing, cancel, tx));
        rx
    }
}
