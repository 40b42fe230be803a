//! LED and input assignments for the Orange Pi board.
//!
//! Single source of truth: adapters and config defaults reference this
//! module rather than hard-coding sysfs paths.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Status LEDs (sysfs `leds` class)
// ---------------------------------------------------------------------------

/// Red status LED brightness attribute.
pub const RED_LED_PATH: &str = "/sys/class/leds/orangepi:red:status/brightness";
/// Green power LED brightness attribute.
pub const GREEN_LED_PATH: &str = "/sys/class/leds/orangepi:green:pwr/brightness";

// ---------------------------------------------------------------------------
// Board button (evdev)
// ---------------------------------------------------------------------------

/// Input device the board button reports on.
pub const BUTTON_DEVICE_PATH: &str = "/dev/input/event0";

// ---------------------------------------------------------------------------
// Output identity
// ---------------------------------------------------------------------------

/// One of the two addressable binary LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    Red,
    Green,
}

impl Output {
    /// Number of outputs. Sizes the per-output slot arrays.
    pub const COUNT: usize = 2;

    pub const ALL: [Output; Self::COUNT] = [Output::Red, Output::Green];

    /// Slot index for per-output tables.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Output {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(Self::Red),
            "green" => Ok(Self::Green),
            _ => Err(ConfigError::UnknownOutput),
        }
    }
}
