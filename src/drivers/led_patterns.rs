//! Blink pattern definitions.
//!
//! A [`Pattern`] is one cycle of on/off phases. The scheduler replays it
//! against an absolute time base, so only the phase durations matter
//! here. No timing state lives in a pattern.
//!
//! ## Well-known patterns
//!
//! | Pattern  | Phases (s)      | Use                                   |
//! |----------|-----------------|---------------------------------------|
//! | Armed    | on 0.95 off 0.05| Button held: "listening", 1 dip per s |
//! | Confirm  | on 0.5 off 0.5  | Flash once per selected command       |

use core::time::Duration;

use crate::error::ConfigError;

/// Default armed pattern, in alternating seconds starting with "on".
pub const ARMED_PATTERN_SECS: [f64; 2] = [0.95, 0.05];

/// Default confirmation pattern, in alternating seconds starting with "on".
pub const CONFIRM_PATTERN_SECS: [f64; 2] = [0.5, 0.5];

const ARMED_PATTERN_MS: [u64; 2] = [950, 50];
const CONFIRM_PATTERN_MS: [u64; 2] = [500, 500];

/// One phase of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub duration: Duration,
    pub on: bool,
}

impl Phase {
    pub fn new(duration: Duration, on: bool) -> Result<Self, ConfigError> {
        if duration.is_zero() {
            return Err(ConfigError::InvalidPhase);
        }
        Ok(Self { duration, on })
    }

    /// Build a phase from a seconds value, rejecting zero, negative,
    /// NaN and overflowing durations.
    pub fn from_secs(secs: f64, on: bool) -> Result<Self, ConfigError> {
        let duration = Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidPhase)?;
        Self::new(duration, on)
    }
}

/// An ordered, non-empty cycle of phases with a positive period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    phases: Vec<Phase>,
    period: Duration,
}

impl Pattern {
    pub fn new(phases: Vec<Phase>) -> Result<Self, ConfigError> {
        if phases.is_empty() {
            return Err(ConfigError::EmptyPattern);
        }
        let period = phases.iter().map(|p| p.duration).sum();
        Ok(Self { phases, period })
    }

    /// Build a pattern from durations that alternate on/off, starting on.
    ///
    /// `[0.5, 0.5, 1.0, 1.0]` is on 0.5 s, off 0.5 s, on 1 s, off 1 s.
    pub fn alternating(secs: &[f64]) -> Result<Self, ConfigError> {
        let phases = secs
            .iter()
            .enumerate()
            .map(|(i, &s)| Phase::from_secs(s, i % 2 == 0))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(phases)
    }

    /// Default "button held" pattern.
    pub fn armed() -> Self {
        Self::from_millis(&ARMED_PATTERN_MS)
    }

    /// Default confirmation flash pattern.
    pub fn confirm() -> Self {
        Self::from_millis(&CONFIRM_PATTERN_MS)
    }

    /// Infallible constructor for the non-zero constants above.
    fn from_millis(ms: &[u64]) -> Self {
        let phases: Vec<Phase> = ms
            .iter()
            .enumerate()
            .map(|(i, &m)| Phase {
                duration: Duration::from_millis(m),
                on: i % 2 == 0,
            })
            .collect();
        let period = phases.iter().map(|p| p.duration).sum();
        Self { phases, period }
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Length of one full cycle.
    pub fn period(&self) -> Duration {
        self.period
    }
}
