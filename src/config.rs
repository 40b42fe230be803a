//! System configuration parameters
//!
//! All tunable parameters for holdcmd. Values are read from a JSON file
//! (`holdcmd.json` by default); any field left out keeps its default.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::drivers::led_patterns::{ARMED_PATTERN_SECS, CONFIRM_PATTERN_SECS, Pattern};
use crate::error::ConfigError;
use crate::fsm::decoder::DecoderConfig;
use crate::pins::{BUTTON_DEVICE_PATH, GREEN_LED_PATH, Output, RED_LED_PATH};

/// Looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "holdcmd.json";

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Feedback ---
    /// LED used for press feedback ("red" or "green")
    pub status_output: String,
    /// Phase durations (seconds) shown while the button is held
    pub armed_pattern: Vec<f64>,
    /// Phase durations (seconds) of one confirmation flash
    pub confirm_pattern: Vec<f64>,
    /// Pause between release and the first flash (milliseconds)
    pub confirm_pause_ms: u64,

    // --- Commands ---
    /// Shell command list, one command per line
    pub command_list: PathBuf,

    // --- Devices ---
    /// evdev node of the push button
    pub input_device: PathBuf,
    /// sysfs brightness file of the red LED
    pub red_led: PathBuf,
    /// sysfs brightness file of the green LED
    pub green_led: PathBuf,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Feedback
            status_output: Output::Red.name().into(),
            armed_pattern: ARMED_PATTERN_SECS.to_vec(),
            confirm_pattern: CONFIRM_PATTERN_SECS.to_vec(),
            confirm_pause_ms: 1000,

            // Commands
            command_list: PathBuf::from("commands.txt"),

            // Devices
            input_device: PathBuf::from(BUTTON_DEVICE_PATH),
            red_led: PathBuf::from(RED_LED_PATH),
            green_led: PathBuf::from(GREEN_LED_PATH),
        }
    }
}

impl SystemConfig {
    /// Load and validate `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("config: {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                warn!("config: cannot read {}: {}", path.display(), e);
                return Err(ConfigError::Malformed);
            }
        };

        let config = Self::from_json(&text).inspect_err(|e| {
            warn!("config: {} rejected: {}", path.display(), e);
        })?;
        info!("config: loaded {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|e| {
            warn!("config: malformed JSON: {}", e);
            ConfigError::Malformed
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.decoder_config().map(drop)
    }

    pub fn status_output(&self) -> Result<Output, ConfigError> {
        self.status_output.parse()
    }

    pub fn confirm_pause(&self) -> Duration {
        Duration::from_millis(self.confirm_pause_ms)
    }

    /// Build the validated decoder settings.
    pub fn decoder_config(&self) -> Result<DecoderConfig, ConfigError> {
        Ok(DecoderConfig {
            status_output: self.status_output()?,
            armed_pattern: Pattern::alternating(&self.armed_pattern)?,
            confirm_pattern: Pattern::alternating(&self.confirm_pattern)?,
            confirm_pause: self.confirm_pause(),
        })
    }
}
