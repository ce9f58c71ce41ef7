//! Pitch Writer TUI - Terminal interface for the pitch writer
//!
//! A full-screen form on the left (company, problem, solution, ask, tone) and
//! three output panels on the right that fill in word by word as the
//! Conductor streams the pitch.
//!
//! # Architecture
//!
//! - **App**: event loop, key handling and layout
//! - **Form**: local edit buffers, forwarded to the Conductor on every change
//! - **Display**: state rebuilt from `ConductorMessage`s
//! - **Widgets**: wrapped text blocks with a streaming cursor
//! - **Headless**: one generation printed to stdout

pub mod app;
pub mod cli;
pub mod conductor_client;
pub mod display;
pub mod form;
pub mod headless;
pub mod theme;
pub mod widgets;

pub use app::App;
