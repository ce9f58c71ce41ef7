//! Generation Backends
//!
//! The Conductor talks to a [`GenerationBackend`] to turn a composed draft
//! into a stream of tokens. There is no inference server: the only backend
//! shipped is [`TemplateBackend`], which replays the draft word by word.
//!
//! # Usage
//!
//! ```ignore
//! use pitch_conductor::backend::{GenerationBackend, TemplateBackend};
//!
//! let backend = TemplateBackend::new(Pacing::default(), 64);
//! let mut rx = backend.start(&draft, cancel.clone()).await;
//! while let Some(event) = rx.recv().await { /* ... */ }
//! ```

mod template;
mod traits;

pub use template::TemplateBackend;
pub use traits::GenerationBackend;
