//! Port traits: the boundary between the core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ LedWriter / BlinkScheduler / PressDecoder
//! ```
//!
//! Driven adapters (sysfs LEDs, the monotonic clock, the command list)
//! implement these traits. The core consumes them via generics, so it
//! never touches hardware directly.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::SinkError;
use crate::pins::Output;

use super::commands::Command;

// ───────────────────────────────────────────────────────────────
// LED sink port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-only access to the two LEDs.
///
/// Only the writer worker owns a sink. `write` must not return until the
/// value has been flushed to the device.
pub trait LedSink {
    fn write(&mut self, output: Output, on: bool) -> Result<(), SinkError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time source for hold measurement and decoder pauses.
pub trait Clock {
    fn now(&self) -> Instant;

    fn sleep(&self, duration: Duration);
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

// ───────────────────────────────────────────────────────────────
// Command executor port (driven adapter: domain → shell)
// ───────────────────────────────────────────────────────────────

/// Receives the resolved command once confirmation has finished.
///
/// Failures of the executed command are the executor's concern; the
/// decoder's responsibility ends at the hand-off.
pub trait CommandExecutor {
    fn execute(&mut self, command: Command);
}
