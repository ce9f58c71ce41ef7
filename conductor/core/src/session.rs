//! Generation Sessions
//!
//! A session is one validated, cancellable run of the emission sequence,
//! created for a single "Generate" request. The Conductor holds at most one
//! active session and replaces it wholesale when a new request arrives; a
//! session is never restarted or reused.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::emission::SequenceOutcome;
use crate::messages::SessionId;
use crate::template::PitchDraft;

/// One in-flight generation
#[derive(Debug)]
pub struct GenerationSession {
    id: SessionId,
    cancel: CancellationToken,
    /// What the channels should read once the session completes
    draft: PitchDraft,
    started_at: Instant,
    tokens_received: u32,
    outcome: Option<SequenceOutcome>,
}

impl GenerationSession {
    /// Start a new session for a composed draft
    #[must_use]
    pub fn new(draft: PitchDraft) -> Self {
        Self {
            id: SessionId::new(),
            cancel: CancellationToken::new(),
            draft,
            started_at: Instant::now(),
            tokens_received: 0,
            outcome: None,
        }
    }

    /// Session identifier
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Target draft
    #[must_use]
    pub fn draft(&self) -> &PitchDraft {
        &self.draft
    }

    /// A handle the producer can watch for cancellation
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Signal cancellation (idempotent)
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        if self.outcome.is_none() {
            self.outcome = Some(SequenceOutcome::Cancelled);
        }
    }

    /// Whether cancellation has been signalled
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Record a received token
    pub fn record_token(&mut self) {
        self.tokens_received += 1;
    }

    /// Tokens received so far
    #[must_use]
    pub fn tokens_received(&self) -> u32 {
        self.tokens_received
    }

    /// Record how the producer finished
    pub fn finish(&mut self, outcome: SequenceOutcome) {
        if self.outcome.is_none() {
            self.outcome = Some(outcome);
        }
    }

    /// Terminal outcome, if the session has ended
    #[must_use]
    pub fn outcome(&self) -> Option<SequenceOutcome> {
        self.outcome
    }

    /// Time since the session started
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Time since the session started, in whole milliseconds
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        whole_millis(self.elapsed())
    }
}

/// Milliseconds in `duration`, saturating at `u64::MAX`
fn whole_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl Drop for GenerationSession {
    fn drop(&mut self) {
        // A dropped session must never keep its producer alive
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_get_distinct_ids() {
        let a = GenerationSession::new(PitchDraft::default());
        let b = GenerationSession::new(PitchDraft::default());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_cancel_is_idempotent_and_shared() {
        let mut session = GenerationSession::new(PitchDraft::default());
        let token = session.cancellation_token();
        assert!(!token.is_cancelled());

        session.cancel();
        session.cancel();
        assert!(token.is_cancelled());
        assert!(session.is_cancelled());
        assert_eq!(session.outcome(), Some(SequenceOutcome::Cancelled));
    }

    #[test]
    fn test_first_outcome_wins() {
        let mut session = GenerationSession::new(PitchDraft::default());
        session.finish(SequenceOutcome::Completed);
        session.cancel();
        assert_eq!(session.outcome(), Some(SequenceOutcome::Completed));
    }

    #[test]
    fn test_drop_cancels_token() {
        let session = GenerationSession::new(PitchDraft::default());
        let token = session.cancellation_token();
        drop(session);
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_whole_millis_saturates() {
        assert_eq!(whole_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(whole_millis(Duration::MAX), u64::MAX);

        let session = GenerationSession::new(PitchDraft::default());
        assert!(session.elapsed_ms() < 60_000);
    }

    #[test]
    fn test_token_counter() {
        let mut session = GenerationSession::new(PitchDraft::default());
        session.record_token();
        session.record_token();
        assert_eq!(session.tokens_received(), 2);
    }
}
