//! Envelope processing configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use sf_envelope::EnvelopeConfig;
//!
//! let config = EnvelopeConfig::default()
//!     .with_max_payload_bytes(64 * 1024)
//!     .with_replay_window_width(128);
//! config.validate()?;
//! ```

use crate::domain::errors::ConfigError;
use serde::{Deserialize, Serialize};
use sf_replay::MAX_WINDOW_WIDTH;
use std::env;

/// Default payload limit (1 MiB).
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

/// Envelope builder and verifier configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeConfig {
    /// Largest plaintext payload a builder accepts
    pub max_payload_bytes: usize,
    /// Sequence numbers tracked behind the highest, per sender
    pub replay_window_width: u32,
    /// Recompute and compare the message id during verification
    pub verify_message_id: bool,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            replay_window_width: sf_replay::DEFAULT_WINDOW_WIDTH,
            verify_message_id: true,
        }
    }
}

impl EnvelopeConfig {
    /// Validate limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.replay_window_width == 0 || self.replay_window_width > MAX_WINDOW_WIDTH {
            return Err(ConfigError::InvalidWindowWidth {
                width: self.replay_window_width,
                max: MAX_WINDOW_WIDTH,
            });
        }

        if self.max_payload_bytes == 0 {
            return Err(ConfigError::ZeroPayloadLimit);
        }

        Ok(())
    }

    /// Create configuration from environment variables, falling back to
    /// defaults for unset variables.
    ///
    /// # Environment Variables
    ///
    /// - `SF_MAX_PAYLOAD_BYTES`: payload limit (default: 1048576)
    /// - `SF_REPLAY_WINDOW`: replay window width (default: 64)
    /// - `SF_VERIFY_MESSAGE_ID`: message id cross-check (default: true)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            max_payload_bytes: env_parse("SF_MAX_PAYLOAD_BYTES")?
                .unwrap_or(defaults.max_payload_bytes),
            replay_window_width: env_parse("SF_REPLAY_WINDOW")?
                .unwrap_or(defaults.replay_window_width),
            verify_message_id: env_parse("SF_VERIFY_MESSAGE_ID")?
                .unwrap_or(defaults.verify_message_id),
        };
        config.validate()?;
        Ok(config)
    }

    /// Builder-style method to set the payload limit
    pub fn with_max_payload_bytes(mut self, max: usize) -> Self {
        self.max_payload_bytes = max;
        self
    }

    /// Builder-style method to set the replay window width
    pub fn with_replay_window_width(mut self, width: u32) -> Self {
        self.replay_window_width = width;
        self
    }

    /// Builder-style method to toggle the message id cross-check
    pub fn with_verify_message_id(mut self, verify: bool) -> Self {
        self.verify_message_id = verify;
        self
    }
}

fn env_parse<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
        Err(_) => Ok(None),
    }
}
