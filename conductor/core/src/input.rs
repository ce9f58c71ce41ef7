//! Pitch Input Model
//!
//! The five form fields a surface collects before a generation can start.
//! Values are stored exactly as the surface supplied them; trimming only
//! happens during validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single form field
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// Company name (single line)
    Company,
    /// Problem statement
    Problem,
    /// Proposed solution
    Solution,
    /// What is being asked for
    Ask,
    /// Tone of voice
    Tone,
}

impl Field {
    /// All fields in form order
    pub const ALL: [Field; 5] = [
        Field::Company,
        Field::Problem,
        Field::Solution,
        Field::Ask,
        Field::Tone,
    ];

    /// Lowercase field name, as used in validation messages
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Problem => "problem",
            Self::Solution => "solution",
            Self::Ask => "ask",
            Self::Tone => "tone",
        }
    }

    /// Label shown next to the field in a form
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Company => "Company",
            Self::Problem => "Problem",
            Self::Solution => "Solution",
            Self::Ask => "Ask",
            Self::Tone => "Tone",
        }
    }

    /// Whether the field accepts multi-line text
    #[must_use]
    pub fn is_multiline(self) -> bool {
        matches!(self, Self::Problem | Self::Solution | Self::Ask)
    }

    /// Next field in form order (wraps)
    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous field in form order (wraps)
    #[must_use]
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned by strict tone parsing
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown tone '{0}' (expected confident, friendly, casual or technical)")]
pub struct ToneParseError(pub String);

/// Tone of voice for the generated copy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Confident (default)
    #[default]
    Confident,
    /// Friendly
    Friendly,
    /// Casual
    Casual,
    /// Technical
    Technical,
}

impl Tone {
    /// All tones in selector order
    pub const ALL: [Tone; 4] = [Tone::Confident, Tone::Friendly, Tone::Casual, Tone::Technical];

    /// The adjective used in the templates
    #[must_use]
    pub fn adjective(self) -> &'static str {
        match self {
            Self::Confident => "confident",
            Self::Friendly => "friendly",
            Self::Casual => "casual",
            Self::Technical => "technical",
        }
    }

    /// Option label shown in the selector
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Confident => "Confident",
            Self::Friendly => "Friendly",
            Self::Casual => "Casual",
            Self::Technical => "Technical",
        }
    }

    /// Parse a tone, falling back to [`Tone::Confident`] for anything unrecognized
    ///
    /// Matching is exact: the selector only ever produces the lowercase names.
    #[must_use]
    pub fn from_input(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    /// Next tone in selector order (wraps)
    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous tone in selector order (wraps)
    #[must_use]
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl FromStr for Tone {
    type Err = ToneParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confident" => Ok(Self::Confident),
            "friendly" => Ok(Self::Friendly),
            "casual" => Ok(Self::Casual),
            "technical" => Ok(Self::Technical),
            other => Err(ToneParseError(other.to_string())),
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.adjective())
    }
}

/// The raw form values
///
/// `tone` is kept as a string so that blank and unrecognized values survive
/// until validation and template expansion decide what to do with them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchInput {
    /// Company name
    pub company: String,
    /// Problem statement
    pub problem: String,
    /// Proposed solution
    pub solution: String,
    /// What is being asked for
    pub ask: String,
    /// Tone of voice (raw selector value)
    pub tone: String,
}

impl Default for PitchInput {
    fn default() -> Self {
        Self::with_tone(Tone::default())
    }
}

impl PitchInput {
    /// Empty form with the given tone preselected
    #[must_use]
    pub fn with_tone(tone: Tone) -> Self {
        Self {
            company: String::new(),
            problem: String::new(),
            solution: String::new(),
            ask: String::new(),
            tone: tone.adjective().to_string(),
        }
    }

    /// Read a field value
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Company => &self.company,
            Field::Problem => &self.problem,
            Field::Solution => &self.solution,
            Field::Ask => &self.ask,
            Field::Tone => &self.tone,
        }
    }

    /// Replace a field value
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Company => self.company = value,
            Field::Problem => self.problem = value,
            Field::Solution => self.solution = value,
            Field::Ask => self.ask = value,
            Field::Tone => self.tone = value,
        }
    }

    /// Builder-style setter
    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// The tone used by the templates (unrecognized values fall back to confident)
    #[must_use]
    pub fn effective_tone(&self) -> Tone {
        Tone::from_input(&self.tone)
    }
}
