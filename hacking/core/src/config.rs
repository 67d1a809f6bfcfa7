//! TOML Configuration File Support
//!
//! Loads game defaults and timing from `~/.config/hacking-game/config.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. Environment variables
//! 2. TOML configuration file
//! 3. Default values
//!
//! Start requests may still override lives and speeds per session; the
//! session defaults here only fill in what a request leaves out.
//!
//! # Example Configuration
//!
//! ```toml
//! [session]
//! lives = 5
//! min_speed = 20
//! max_speed = 150
//!
//! [timing]
//! bootstrap_retry_delay_ms = 25
//! bootstrap_max_attempts = 100
//! reset_delay_ms = 500
//! end_delay_ms = 2000
//! rng_seed = 42
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validator::{DEFAULT_LIVES, DEFAULT_MAX_SPEED, DEFAULT_MIN_SPEED};

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
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Session defaults section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionToml {
    /// Lives when a start request omits them
    pub lives: Option<i32>,

    /// Minimum column speed when a start request omits it
    pub min_speed: Option<i32>,

    /// Maximum column speed when a start request omits it
    pub max_speed: Option<i32>,
}

/// Timing section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingToml {
    /// Delay between surface readiness polls
    pub bootstrap_retry_delay_ms: Option<u64>,

    /// Failed polls before giving up on the surface
    pub bootstrap_max_attempts: Option<u32>,

    /// Delay before columns re-spin after a mismatch
    pub reset_delay_ms: Option<u64>,

    /// Delay between the final outcome and teardown
    pub end_delay_ms: Option<u64>,

    /// Fixed seed for column speeds
    pub rng_seed: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HackingToml {
    /// Session defaults section
    pub session: SessionToml,

    /// Timing section
    pub timing: TimingToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved game configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Default lives
    pub default_lives: i32,
    /// Default minimum column speed
    pub default_min_speed: i32,
    /// Default maximum column speed
    pub default_max_speed: i32,
    /// Delay between surface readiness polls
    pub bootstrap_retry_delay_ms: u64,
    /// Failed polls before `SurfaceLoadTimeout`
    pub bootstrap_max_attempts: u32,
    /// Delay before `Reset` fires
    pub reset_delay_ms: u64,
    /// Delay before `RemoveThenSucceed` / `RemoveThenFail` fire
    pub end_delay_ms: u64,
    /// Fixed seed for column speeds (entropy when `None`)
    pub rng_seed: Option<u64>,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    source: ConfigSource,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            default_lives: DEFAULT_LIVES,
            default_min_speed: DEFAULT_MIN_SPEED,
            default_max_speed: DEFAULT_MAX_SPEED,
            bootstrap_retry_delay_ms: 25,
            bootstrap_max_attempts: 100,
            reset_delay_ms: 500,
            end_delay_ms: 2000,
            rng_seed: None,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl GameConfig {
    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Use a fixed seed for column speeds
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Check the timing values
    ///
    /// Session defaults are not checked here; they go through the regular
    /// session validation when a start request uses them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a zero attempt budget or
    /// a zero retry delay.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bootstrap_max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "bootstrap_max_attempts must be at least 1".to_string(),
            ));
        }
        if self.bootstrap_retry_delay_ms == 0 {
            return Err(ConfigError::ValidationError(
                "bootstrap_retry_delay_ms must be at least 1".to_string(),
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
/// Returns `$XDG_CONFIG_HOME/hacking-game/config.toml` or
/// `~/.config/hacking-game/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("hacking-game").join("config.toml"))
}

/// Load configuration from the default path, then the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the resulting configuration is invalid. A missing file is not an error.
pub fn load_config() -> Result<GameConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path, then the environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or if the resulting configuration is invalid.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<GameConfig, ConfigError> {
    let mut config = load_file_config(path)?;
    apply_env_config(&mut config);
    config.validate()?;
    Ok(config)
}

/// File and defaults only, no environment
fn load_file_config(path: Option<PathBuf>) -> Result<GameConfig, ConfigError> {
    let mut config = GameConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: HackingToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
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

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut GameConfig, toml: &HackingToml) {
    if let Some(lives) = toml.session.lives {
        config.default_lives = lives;
    }
    if let Some(speed) = toml.session.min_speed {
        config.default_min_speed = speed;
    }
    if let Some(speed) = toml.session.max_speed {
        config.default_max_speed = speed;
    }

    if let Some(delay) = toml.timing.bootstrap_retry_delay_ms {
        config.bootstrap_retry_delay_ms = delay;
    }
    if let Some(attempts) = toml.timing.bootstrap_max_attempts {
        config.bootstrap_max_attempts = attempts;
    }
    if let Some(delay) = toml.timing.reset_delay_ms {
        config.reset_delay_ms = delay;
    }
    if let Some(delay) = toml.timing.end_delay_ms {
        config.end_delay_ms = delay;
    }
    if toml.timing.rng_seed.is_some() {
        config.rng_seed = toml.timing.rng_seed;
    }
}

/// Parse an environment variable, ignoring unset or malformed values
fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "Ignoring malformed environment override");
            None
        }
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut GameConfig) {
    if let Some(lives) = env_parse("HACKING_LIVES") {
        config.default_lives = lives;
        config.source = ConfigSource::Env;
    }
    if let Some(speed) = env_parse("HACKING_MIN_SPEED") {
        config.default_min_speed = speed;
        config.source = ConfigSource::Env;
    }
    if let Some(speed) = env_parse("HACKING_MAX_SPEED") {
        config.default_max_speed = speed;
        config.source = ConfigSource::Env;
    }
    if let Some(delay) = env_parse("HACKING_RETRY_DELAY_MS") {
        config.bootstrap_retry_delay_ms = delay;
        config.source = ConfigSource::Env;
    }
    if let Some(attempts) = env_parse("HACKING_MAX_ATTEMPTS") {
        config.bootstrap_max_attempts = attempts;
        config.source = ConfigSource::Env;
    }
    if let Some(delay) = env_parse("HACKING_RESET_DELAY_MS") {
        config.reset_delay_ms = delay;
        config.source = ConfigSource::Env;
    }
    if let Some(delay) = env_parse("HACKING_END_DELAY_MS") {
        config.end_delay_ms = delay;
        config.source = ConfigSource::Env;
    }
    if let Some(seed) = env_parse("HACKING_RNG_SEED") {
        config.rng_seed = Some(seed);
        config.source = ConfigSource::Env;
    }
}
