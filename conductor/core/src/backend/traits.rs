//! Backend Traits
//!
//! A backend owns the producer side of a generation: it receives the draft
//! and a cancellation token, and hands back the consumer end of a channel.
//! The channel carries tokens followed by exactly one `Finished` event, or
//! simply closes if the producer dies.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::emission::EmissionEvent;
use crate::template::PitchDraft;

/// Producer of emission events for a draft
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Backend name for logs (e.g., "template")
    fn name(&self) -> &str;

    /// Start producing tokens for `draft`
    ///
    /// The producer must stop promptly once `cancel` fires or the returned
    /// receiver is dropped.
    async fn start(
        &self,
        draft: &PitchDraft,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<EmissionEvent>;
}
