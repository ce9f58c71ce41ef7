//! Command Line Arguments

use std::path::PathBuf;

use clap::Parser;

use pitch_conductor::{ConfigOverrides, Field, PitchInput, Tone};

/// Pitch Writer - turn five answers into a headline, subhead and body
#[derive(Parser, Debug)]
#[command(name = "pitch-tui")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "PITCH_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run one generation without a terminal and print the result
    #[arg(long)]
    pub headless: bool,

    /// Company name (headless)
    #[arg(long, default_value = "", requires = "headless")]
    pub company: String,

    /// Problem statement (headless)
    #[arg(long, default_value = "", requires = "headless")]
    pub problem: String,

    /// Proposed solution (headless)
    #[arg(long, default_value = "", requires = "headless")]
    pub solution: String,

    /// What you are asking for (headless)
    #[arg(long, default_value = "", requires = "headless")]
    pub ask: String,

    /// Tone of voice: confident, friendly, casual or technical
    #[arg(long)]
    pub tone: Option<String>,

    /// Delay after each headline or subhead word, in milliseconds
    #[arg(long, value_name = "MS")]
    pub short_delay_ms: Option<u64>,

    /// Delay after each body word, in milliseconds
    #[arg(long, value_name = "MS")]
    pub long_delay_ms: Option<u64>,

    /// Stream without pacing delays (wins over the delay options)
    #[arg(long)]
    pub instant: bool,
}

impl Args {
    /// CLI overrides to apply on top of file and environment configuration
    ///
    /// A recognized `--tone` also becomes the default tone of the interactive form.
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new().with_instant(self.instant);
        if let Some(tone) = self.tone.as_deref().and_then(|t| t.parse::<Tone>().ok()) {
            overrides = overrides.with_default_tone(tone);
        }
        if let Some(ms) = self.short_delay_ms {
            overrides = overrides.with_short_delay_ms(ms);
        }
        if let Some(ms) = self.long_delay_ms {
            overrides = overrides.with_long_delay_ms(ms);
        }
        overrides
    }

    /// Form values for a headless run
    ///
    /// The tone is passed through as typed so an unrecognized value behaves
    /// exactly as it would in the form.
    pub fn input(&self, default_tone: Tone) -> PitchInput {
        let tone = self
            .tone
            .clone()
            .unwrap_or_else(|| default_tone.adjective().to_string());
        PitchInput::with_tone(default_tone)
            .with(Field::Company, self.company.as_str())
            .with(Field::Problem, self.problem.as_str())
            .with(Field::Solution, self.solution.as_str())
            .with(Field::Ask, self.ask.as_str())
            .with(Field::Tone, tone)
    }
}
