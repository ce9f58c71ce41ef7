//! Token Emission
//!
//! Simulated streaming output. A [`PitchDraft`] is split into words, the three
//! word lists are interleaved round-robin, and each word is handed out with a
//! trailing space.
//!
//! ```text
//!   headline: [Acme:] [a] [friendly] ...
//!   subhead:  [we] [deal] [with] ...             round-robin
//!   body:     [at] [Acme,] [we] ...       ──────────────────────▶  H S B H S B ...
//! ```
//!
//! [`EmissionSequence`] is the synchronous state machine; [`drive`] runs it on
//! the tokio runtime with per-channel pacing and cooperative cancellation.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::template::PitchDraft;

// ============================================================================
// Channels & Tokens
// ============================================================================

/// A named output destination
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Headline section
    Headline,
    /// Subhead section
    Subhead,
    /// Body section
    Body,
}

impl Channel {
    /// All channels in interleave order
    pub const ALL: [Channel; 3] = [Channel::Headline, Channel::Subhead, Channel::Body];

    /// Section title for display
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Headline => "Headline",
            Self::Subhead => "Subhead",
            Self::Body => "Body",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Headline => f.write_str("headline"),
            Self::Subhead => f.write_str("subhead"),
            Self::Body => f.write_str("body"),
        }
    }
}

/// One emitted word, destined for a channel
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionToken {
    /// Destination channel
    pub channel: Channel,
    /// The word plus one trailing space
    pub text: String,
}

// ============================================================================
// Pacing
// ============================================================================

/// Delays between tokens
///
/// Body tokens wait longer than headline/subhead tokens so the long section
/// streams at a visibly different cadence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacing {
    /// Delay after a headline or subhead token
    pub short: Duration,
    /// Delay after a body token
    pub long: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            short: Duration::from_millis(25),
            long: Duration::from_millis(45),
        }
    }
}

impl Pacing {
    /// No delays at all
    #[must_use]
    pub fn instant() -> Self {
        Self {
            short: Duration::ZERO,
            long: Duration::ZERO,
        }
    }

    /// Delay to wait after emitting a token on `channel`
    #[must_use]
    pub fn delay_after(&self, channel: Channel) -> Duration {
        match channel {
            Channel::Body => self.long,
            Channel::Headline | Channel::Subhead => self.short,
        }
    }
}

// ============================================================================
// Sequence State Machine
// ============================================================================

/// Lifecycle of an emission sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceState {
    /// Built, nothing requested yet
    Idle,
    /// At least one step taken, tokens remain
    Running,
    /// Cancellation observed; terminal
    Cancelled,
    /// Every word emitted; terminal
    Completed,
}

impl SequenceState {
    /// Whether no further tokens can be produced
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }
}

/// How a sequence ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceOutcome {
    /// Ran to completion
    Completed,
    /// Stopped by the cancellation signal
    Cancelled,
}

/// Split on single spaces so that joining with a space restores the input
fn words(text: &str) -> VecDeque<String> {
    text.split(' ').map(str::to_string).collect()
}

/// Round-robin word emitter over the three channels
#[derive(Debug)]
pub struct EmissionSequence {
    lanes: [(Channel, VecDeque<String>); 3],
    /// Lane to try first on the next step
    cursor: usize,
    state: SequenceState,
    emitted: usize,
}

impl EmissionSequence {
    /// Build a fresh sequence for a draft
    #[must_use]
    pub fn new(draft: &PitchDraft) -> Self {
        Self {
            lanes: Channel::ALL.map(|c| (c, words(draft.section(c)))),
            cursor: 0,
            state: SequenceState::Idle,
            emitted: 0,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> SequenceState {
        self.state
    }

    /// Tokens handed out so far
    #[must_use]
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Words not yet emitted across all channels
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.lanes.iter().map(|(_, words)| words.len()).sum()
    }

    /// Terminal outcome, once reached
    #[must_use]
    pub fn outcome(&self) -> Option<SequenceOutcome> {
        match self.state {
            SequenceState::Completed => Some(SequenceOutcome::Completed),
            SequenceState::Cancelled => Some(SequenceOutcome::Cancelled),
            SequenceState::Idle | SequenceState::Running => None,
        }
    }

    /// Stop the sequence; no-op once terminal
    pub fn cancel(&mut self) {
        if !self.state.is_terminal() {
            self.state = SequenceState::Cancelled;
        }
    }

    /// Advance one step
    ///
    /// `is_cancelled` is consulted before every would-be yield. Returns `None`
    /// once the sequence is cancelled or exhausted; it never resumes after that.
    pub fn next_token(&mut self, is_cancelled: impl Fn() -> bool) -> Option<EmissionToken> {
        if self.state.is_terminal() {
            return None;
        }
        self.state = SequenceState::Running;

        if is_cancelled() {
            self.state = SequenceState::Cancelled;
            return None;
        }

        let lane_count = self.lanes.len();
        for offset in 0..lane_count {
            let idx = (self.cursor + offset) % lane_count;
            let (channel, words) = &mut self.lanes[idx];
            if let Some(word) = words.pop_front() {
                self.cursor = (idx + 1) % lane_count;
                self.emitted += 1;
                return Some(EmissionToken {
                    channel: *channel,
                    text: word + " ",
                });
            }
        }

        self.state = SequenceState::Completed;
        None
    }
}

impl Iterator for EmissionSequence {
    type Item = EmissionToken;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token(|| false)
    }
}

// ============================================================================
// Async Driver
// ============================================================================

/// Events a running sequence sends to its consumer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmissionEvent {
    /// A token is ready
    Token(EmissionToken),
    /// The sequence reached a terminal state; nothing follows
    Finished(SequenceOutcome),
}

/// Run a sequence to a terminal state, pacing tokens and honouring `cancel`
///
/// The delay after each token is raced against cancellation so a cancelled
/// sequence stops without waiting out its current delay. A consumer that
/// hangs up is treated as a cancellation.
pub async fn drive(
    mut sequence: EmissionSequence,
    pacing: Pacing,
    cancel: CancellationToken,
    tx: mpsc::Sender<EmissionEvent>,
) -> SequenceOutcome {
    while let Some(token) = sequence.next_token(|| cancel.is_cancelled()) {
        let delay = pacing.delay_after(token.channel);

        if tx.send(EmissionEvent::Token(token)).await.is_err() {
            tracing::debug!("Emission consumer went away, stopping sequence");
            sequence.cancel();
            break;
        }

        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(delay) => {}
            }
        }
    }

    let outcome = sequence.outcome().unwrap_or(SequenceOutcome::Cancelled);
    tracing::debug!(
        outcome = ?outcome,
        emitted = sequence.emitted(),
        "Emission sequence finished"
    );
    // The consumer may already be gone
    let _ = tx.send(EmissionEvent::Finished(outcome)).await;
    outcome
}
