//! TOML configuration for a remote-control endpoint.
//!
//! Example file:
//!
//! ```toml
//! flavor = "negotiated"
//! countdown_seconds = 5
//! tick_interval_ms = 1000
//! envelope = "plain"
//! ```
//!
//! # Serde default values
//!
//! Every field carries a serde default, so an empty file (or no file at all)
//! yields a working direct-flavor configuration, and files written by older
//! versions keep loading when new fields are added.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rc_core::{ControlFlavor, Envelope};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::authorize::DEFAULT_COUNTDOWN_SECONDS;

/// Error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The values parsed but are not usable.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings for one remote-control endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControlConfig {
    /// `"direct"` for the companion mobile app, `"negotiated"` for desktop peers.
    #[serde(default)]
    pub flavor: ControlFlavor,
    /// Ticks before an unanswered authorization request is granted.
    #[serde(default = "default_countdown_seconds")]
    pub countdown_seconds: u32,
    /// Length of one countdown tick in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// `"text"` wraps frames in the host's text-message envelope.
    #[serde(default)]
    pub envelope: Envelope,
}

fn default_countdown_seconds() -> u32 {
    DEFAULT_COUNTDOWN_SECONDS
}
fn default_tick_interval_ms() -> u64 {
    1000
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            flavor: ControlFlavor::default(),
            countdown_seconds: default_countdown_seconds(),
            tick_interval_ms: default_tick_interval_ms(),
            envelope: Envelope::default(),
        }
    }
}

impl ControlConfig {
    /// Parses and validates TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for unusable values.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ControlConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config at `path`, returning defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] for file-system errors other than "not found",
    /// plus every error [`from_toml_str`](Self::from_toml_str) can return.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Serializes the config to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Rejects values the negotiator cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.countdown_seconds == 0 {
            return Err(ConfigError::Invalid(
                "countdown_seconds must be at least 1".to_string(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
