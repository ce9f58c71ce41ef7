//! TOML Configuration File Support
//!
//! Configuration is loaded from `~/.config/pitch-writer/config.toml`.
//!
//! # Configuration Priority
//!
//! Values are applied in the following order (last wins):
//! 1. Default values
//! 2. TOML configuration file
//! 3. Environment variables
//! 4. CLI arguments ([`ConfigOverrides`])
//!
//! # Example Configuration
//!
//! ```toml
//! [pacing]
//! short_delay_ms = 25
//! long_delay_ms = 45
//!
//! [form]
//! default_tone = "friendly"
//!
//! [surface]
//! channel_capacity = 64
//! frame_ms = 33
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::emission::Pacing;
use crate::input::Tone;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Pacing section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingToml {
    /// Delay after headline/subhead tokens in milliseconds
    pub short_delay_ms: Option<u64>,

    /// Delay after body tokens in milliseconds
    pub long_delay_ms: Option<u64>,
}

/// Form section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormToml {
    /// Tone preselected in a fresh form
    pub default_tone: Option<String>,
}

/// Surface section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceToml {
    /// Buffer size of the token channel and the surface message channel
    pub channel_capacity: Option<usize>,

    /// Target frame duration for the TUI in milliseconds
    pub frame_ms: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchToml {
    /// Token pacing
    pub pacing: PacingToml,

    /// Form defaults
    pub form: FormToml,

    /// Surface tuning
    pub surface: SurfaceToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved configuration
#[derive(Clone, Debug)]
pub struct PitchConfig {
    /// Delays between emitted tokens
    pub pacing: Pacing,

    /// Tone preselected in a fresh form
    pub default_tone: Tone,

    /// Buffer size for token and surface channels
    pub channel_capacity: usize,

    /// Target TUI frame duration
    pub frame_duration: Duration,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            pacing: Pacing::default(),
            default_tone: Tone::default(),
            channel_capacity: 64,
            frame_duration: Duration::from_millis(33),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl PitchConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Reject values the rest of the system cannot work with
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a zero channel capacity or
    /// a zero frame duration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "channel_capacity must be at least 1".to_string(),
            ));
        }
        if self.frame_duration.is_zero() {
            return Err(ConfigError::ValidationError(
                "frame_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/pitch-writer/config.toml` or
/// `~/.config/pitch-writer/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pitch-writer").join("config.toml"))
}

/// Load configuration from the default path, then the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or a
/// resulting value is invalid. A missing config file is not an error.
pub fn load_config() -> Result<PitchConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path, then the environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed, or
/// a resulting value is invalid.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<PitchConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit environment lookup
///
/// # Errors
///
/// Same as [`load_config_from_path`].
pub fn load_config_with_env(
    path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<PitchConfig, ConfigError> {
    let mut config = PitchConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: PitchToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env)?;
    config.validate()?;

    Ok(config)
}

fn parse_tone(value: &str) -> Result<Tone, ConfigError> {
    value
        .parse()
        .map_err(|e| ConfigError::ValidationError(format!("default_tone: {e}")))
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut PitchConfig, toml: &PitchToml) -> Result<(), ConfigError> {
    if let Some(ms) = toml.pacing.short_delay_ms {
        config.pacing.short = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.pacing.long_delay_ms {
        config.pacing.long = Duration::from_millis(ms);
    }

    if let Some(ref tone) = toml.form.default_tone {
        config.default_tone = parse_tone(tone)?;
    }

    if let Some(capacity) = toml.surface.channel_capacity {
        config.channel_capacity = capacity;
    }
    if let Some(ms) = toml.surface.frame_ms {
        config.frame_duration = Duration::from_millis(ms);
    }

    Ok(())
}

/// Apply environment variable overrides to the config
fn apply_env_config(
    config: &mut PitchConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(ms) = env("PITCH_SHORT_DELAY_MS").and_then(|v| v.parse::<u64>().ok()) {
        config.pacing.short = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = env("PITCH_LONG_DELAY_MS").and_then(|v| v.parse::<u64>().ok()) {
        config.pacing.long = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(tone) = env("PITCH_DEFAULT_TONE") {
        config.default_tone = parse_tone(&tone)?;
        config.source = ConfigSource::Env;
    }
    if let Some(n) = env("PITCH_CHANNEL_CAPACITY").and_then(|v| v.parse::<usize>().ok()) {
        config.channel_capacity = n;
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = env("PITCH_FRAME_MS").and_then(|v| v.parse::<u64>().ok()) {
        config.frame_duration = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    Ok(())
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Drop all pacing delays
    pub instant: bool,

    /// Default tone override
    pub default_tone: Option<Tone>,

    /// Short delay override (milliseconds)
    pub short_delay_ms: Option<u64>,

    /// Long delay override (milliseconds)
    pub long_delay_ms: Option<u64>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable pacing delays
    #[must_use]
    pub fn with_instant(mut self, instant: bool) -> Self {
        self.instant = instant;
        self
    }

    /// Set default tone override
    #[must_use]
    pub fn with_default_tone(mut self, tone: Tone) -> Self {
        self.default_tone = Some(tone);
        self
    }

    /// Set short delay override
    #[must_use]
    pub fn with_short_delay_ms(mut self, ms: u64) -> Self {
        self.short_delay_ms = Some(ms);
        self
    }

    /// Set long delay override
    #[must_use]
    pub fn with_long_delay_ms(mut self, ms: u64) -> Self {
        self.long_delay_ms = Some(ms);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut PitchConfig) {
        if self.instant
            || self.default_tone.is_some()
            || self.short_delay_ms.is_some()
            || self.long_delay_ms.is_some()
        {
            config.source = ConfigSource::Cli;
        }

        if let Some(ms) = self.short_delay_ms {
            config.pacing.short = Duration::from_millis(ms);
        }
        if let Some(ms) = self.long_delay_ms {
            config.pacing.long = Duration::from_millis(ms);
        }
        // Instant wins over explicit delays
        if self.instant {
            config.pacing = Pacing::instant();
        }
        if let Some(tone) = self.default_tone {
            config.default_tone = tone;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_toml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = PitchConfig::default();
        assert_eq!(config.pacing, Pacing::default());
        assert_eq!(config.default_tone, Tone::Confident);
        assert_eq!(config.channel_capacity, 64);
        assert_eq!(config.frame_duration, Duration::from_millis(33));
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.to_string_lossy().contains("pitch-writer"));
            assert!(p.to_string_lossy().ends_with("config.toml"));
        }
    }

    #[test]
    fn test_parse_valid_toml() {
        let file = write_toml(
            r#"
[pacing]
short_delay_ms = 10
long_delay_ms = 80

[form]
default_tone = "technical"

[surface]
channel_capacity = 8
frame_ms = 16
"#,
        );

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.pacing.short, Duration::from_millis(10));
        assert_eq!(config.pacing.long, Duration::from_millis(80));
        assert_eq!(config.default_tone, Tone::Technical);
        assert_eq!(config.channel_capacity, 8);
        assert_eq!(config.frame_duration, Duration::from_millis(16));
        assert_eq!(config.source(), ConfigSource::File);
        assert_eq!(config.config_file_path, Some(file.path().to_path_buf()));
    }

    #[test]
    fn test_parse_partial_toml_keeps_defaults() {
        let file = write_toml("[pacing]\nlong_delay_ms = 100\n");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.pacing.long, Duration::from_millis(100));
        assert_eq!(config.pacing.short, Duration::from_millis(25));
        assert_eq!(config.channel_capacity, 64);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let file = write_toml("[pacing\nshort_delay_ms = ");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_unknown_default_tone_is_rejected() {
        let file = write_toml("[form]\ndefault_tone = \"grumpy\"\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let file = write_toml("[surface]\nchannel_capacity = 0\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("channel_capacity"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = PathBuf::from("/nonexistent/path/config.toml");
        let config = load_config_with_env(Some(path), no_env).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_toml("[pacing]\nshort_delay_ms = 10\n");
        let env: HashMap<&str, &str> = [
            ("PITCH_SHORT_DELAY_MS", "5"),
            ("PITCH_DEFAULT_TONE", "casual"),
            ("PITCH_FRAME_MS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let config = load_config_with_env(Some(file.path().to_path_buf()), |k| {
            env.get(k).map(|v| (*v).to_string())
        })
        .unwrap();

        assert_eq!(config.pacing.short, Duration::from_millis(5));
        assert_eq!(config.default_tone, Tone::Casual);
        // Unparseable numbers are ignored
        assert_eq!(config.frame_duration, Duration::from_millis(33));
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = PitchConfig::default();
        ConfigOverrides::new()
            .with_short_delay_ms(1)
            .with_default_tone(Tone::Friendly)
            .apply(&mut config);

        assert_eq!(config.pacing.short, Duration::from_millis(1));
        assert_eq!(config.pacing.long, Duration::from_millis(45));
        assert_eq!(config.default_tone, Tone::Friendly);
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_instant_override_wins() {
        let mut config = PitchConfig::default();
        ConfigOverrides::new()
            .with_long_delay_ms(500)
            .with_instant(true)
            .apply(&mut config);
        assert_eq!(config.pacing, Pacing::instant());
    }

    #[test]
    fn test_empty_overrides_keep_source() {
        let mut config = PitchConfig::default();
        ConfigOverrides::new().apply(&mut config);
        assert_eq!(config.source(), ConfigSource::Default);
    }
}
