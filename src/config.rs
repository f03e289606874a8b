//! Tunable limits for embedding and extraction.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::{DEFAULT_ITERATIONS, MIN_ITERATIONS};
use crate::stego::audio::DEFAULT_FALLBACK_OFFSET;
use crate::stego::video::DEFAULT_MAX_OVERHEAD_PERCENT;
use crate::MAX_PAYLOAD_SIZE;

/// Errors that can occur while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration shared by every codec and the envelope.
///
/// Both sides of an exchange must agree on `kdf_iterations` and `max_payload_size`; neither
/// is recorded in the carrier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StegoConfig {
    /// Largest payload (salt + ciphertext) accepted inside a frame, in bytes.
    pub max_payload_size: usize,

    /// PBKDF2 iteration count.
    pub kdf_iterations: u32,

    /// How much the video codec may grow a carrier, in percent of its size.
    pub video_max_overhead_percent: u8,

    /// Sample offset tried when a WAV `data` chunk cannot be located during extraction.
    pub audio_fallback_offset: usize,
}

impl Default for StegoConfig {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD_SIZE,
            kdf_iterations: DEFAULT_ITERATIONS,
            video_max_overhead_percent: DEFAULT_MAX_OVERHEAD_PERCENT,
            audio_fallback_offset: DEFAULT_FALLBACK_OFFSET,
        }
    }
}

impl StegoConfig {
    /// Loads a JSON config file; omitted fields keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kdf_iterations < MIN_ITERATIONS {
            return Err(ConfigError::Invalid(format!(
                "kdf_iterations must be at least {}, got {}",
                MIN_ITERATIONS, self.kdf_iterations
            )));
        }
        if self.max_payload_size == 0 || self.max_payload_size > u32::MAX as usize {
            return Err(ConfigError::Invalid(format!(
                "max_payload_size must be in 1..={}, got {}",
                u32::MAX,
                self.max_payload_size
            )));
        }
        if !(1..=100).contains(&self.video_max_overhead_percent) {
            return Err(ConfigError::Invalid(format!(
                "video_max_overhead_percent must be in 1..=100, got {}",
                self.video_max_overhead_percent
            )));
        }
        Ok(())
    }
}
