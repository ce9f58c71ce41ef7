//! Pitch Conductor - Headless Core for the Pitch Writer
//!
//! This crate holds everything the pitch writer does apart from drawing:
//! the form model, validation, copy templates, simulated token streaming and
//! the orchestration that ties them together. It can drive the TUI or run
//! headless for testing and scripting.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        UI Surfaces                              │
//! │        ┌─────────────┐                ┌──────────────────┐      │
//! │        │     TUI     │                │     Headless     │      │
//! │        │  (ratatui)  │                │   (stdout run)   │      │
//! │        └──────┬──────┘                └────────┬─────────┘      │
//! │               └───────────────┬────────────────┘                │
//! │                      SurfaceEvent (up)                          │
//! │                    ConductorMessage (down)                      │
//! └───────────────────────────────┼─────────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────┼─────────────────────────────────┐
//! │                        CONDUCTOR CORE                           │
//! │  ┌────────────────────────────┴──────────────────────────────┐  │
//! │  │                        Conductor                          │  │
//! │  │  ┌───────────┐  ┌────────────┐  ┌─────────┐  ┌─────────┐  │  │
//! │  │  │   Input   │  │ Validation │  │ Session │  │ Backend │  │  │
//! │  │  │   Model   │  │            │  │         │  │(emitter)│  │  │
//! │  │  └───────────┘  └────────────┘  └─────────┘  └─────────┘  │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Conductor`]: Owns the form, the output channels and the active session
//! - [`ConductorMessage`]: Messages sent from Conductor to UI surfaces
//! - [`SurfaceEvent`]: Events sent from UI surfaces to Conductor
//! - [`EmissionSequence`]: Round-robin word emitter over the three channels
//! - [`PitchConfig`]: Resolved configuration (file, environment, CLI)
//!
//! # Quick Start
//!
//! ```ignore
//! use pitch_conductor::{Conductor, Field, PitchConfig};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (tx, mut rx) = mpsc::channel(256);
//!     let mut conductor = Conductor::with_template(PitchConfig::default(), tx);
//!
//!     conductor.set_field(Field::Company, "Acme");
//!     conductor.set_field(Field::Problem, "slow onboarding");
//!     conductor.set_field(Field::Solution, "a guided wizard");
//!     conductor.set_field(Field::Ask, "$2M seed");
//!
//!     conductor.generate().await.unwrap();
//!     conductor.run_to_idle().await;
//!
//!     println!("{}", conductor.channels().headline);
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`input`]: Form fields, tones and the input record
//! - [`validation`]: Required-field checks
//! - [`template`]: Headline, subhead and body composition
//! - [`emission`]: Token sequence, pacing and the async driver
//! - [`backend`]: Token producer abstraction
//! - [`session`]: One cancellable generation run
//! - [`conductor`]: Main Conductor struct
//! - [`events`]: Events from UI surfaces to Conductor
//! - [`messages`]: Messages from Conductor to UI surfaces
//! - [`config`]: TOML, environment and CLI configuration
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod conductor;
pub mod config;
pub mod emission;
pub mod events;
pub mod input;
pub mod messages;
pub mod session;
pub mod template;
pub mod validation;

// Re-exports for convenience
pub use backend::{GenerationBackend, TemplateBackend};
pub use conductor::{Conductor, GenerateError, SURFACE_BURST};
pub use emission::{
    drive, Channel, EmissionEvent, EmissionSequence, EmissionToken, Pacing, SequenceOutcome,
    SequenceState,
};
pub use events::{SurfaceEvent, SurfaceType};
pub use input::{Field, PitchInput, Tone, ToneParseError};
pub use messages::{ConductorMessage, ConductorState, EventId, NotifyLevel, SessionId};
pub use session::GenerationSession;
pub use template::PitchDraft;
pub use validation::{validate, ValidationResult};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, load_config_with_env,
    ConfigError, ConfigOverrides, ConfigSource, PitchConfig, PitchToml,
};
