//! Monotonic time adapter.
//!
//! Implements [`Clock`] on top of `std::time::Instant` and
//! `std::thread::sleep`. Tests substitute a manual clock.

use std::time::{Duration, Instant};

use crate::app::ports::Clock;

/// Wall-independent clock for hold measurement.
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }

    /// Seconds since the clock was created (monotonic).
    pub fn uptime_secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
