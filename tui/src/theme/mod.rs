//! Theme and Colors
//!
//! A small palette: one accent for focus and the action, one color per output
//! section, and the usual status colors.

use ratatui::style::Color;

// ============================================================================
// Form Colors
// ============================================================================

/// Focused field border and the Generate action
pub const ACCENT: Color = Color::Rgb(255, 176, 64);

/// Field labels and unfocused borders
pub const LABEL: Color = Color::Rgb(150, 150, 160);

/// Text the user typed
pub const INPUT_TEXT: Color = Color::Rgb(230, 230, 230);

/// Selected tone chip
pub const TONE_SELECTED: Color = Color::Rgb(120, 200, 255);

// ============================================================================
// Output Colors
// ============================================================================

/// Headline panel text
pub const HEADLINE: Color = Color::Rgb(255, 220, 120);

/// Subhead panel text
pub const SUBHEAD: Color = Color::Rgb(180, 210, 255);

/// Body panel text
pub const BODY: Color = Color::Rgb(220, 220, 220);

/// Streaming cursor marker
pub const CURSOR: Color = Color::Rgb(255, 176, 64);

// ============================================================================
// Status Colors
// ============================================================================

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Warning yellow
pub const WARNING_YELLOW: Color = Color::Rgb(240, 200, 80);

/// Success green
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);
