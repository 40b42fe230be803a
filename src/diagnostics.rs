//! LED self-test sequences and runtime diagnostics.
//!
//! Used by the `led-selftest` binary to check the wiring of both LEDs
//! and the timing of the blink engine by eye:
//!
//! - [`alternation_sweep`]: red and green alternate, faster and faster.
//! - [`dual_blink`]: both outputs blink independently, one bounded and
//!   one forever.
//! - [`restore`]: back to the idle look (red off, green on).
//!
//! A panic hook that routes panics through the logger is installed by
//! both binaries.

use std::time::Duration;

use log::info;

use crate::app::ports::Clock;
use crate::drivers::blink::{BlinkHandle, BlinkScheduler, Repeat};
use crate::drivers::led_patterns::Pattern;
use crate::drivers::led_writer::WriteBatch;
use crate::error::Result;
use crate::pins::Output;

/// (step milliseconds, repetitions) of the default sweep.
const SWEEP_PLAN: [(u64, usize); 8] = [
    (600, 1),
    (500, 2),
    (400, 2),
    (300, 3),
    (200, 5),
    (100, 10),
    (50, 20),
    (30, 30),
];

const DUAL_RED_SECS: [f64; 4] = [0.1, 0.9, 0.2, 0.8];
const DUAL_GREEN_SECS: [f64; 4] = [0.2, 0.8, 0.1, 0.9];
const DUAL_RED_CYCLES: u32 = 3;

/// The default accelerating step sequence.
pub fn sweep_steps() -> Vec<Duration> {
    SWEEP_PLAN
        .iter()
        .flat_map(|&(ms, n)| core::iter::repeat_n(Duration::from_millis(ms), n))
        .collect()
}

/// Idle look: red off, green on.
const IDLE_LOOK: [(Output, bool); 2] = [(Output::Red, false), (Output::Green, true)];
const SWAPPED_LOOK: [(Output, bool); 2] = [(Output::Red, true), (Output::Green, false)];

/// Alternate red and green once per step, blocking for the whole sweep.
///
/// Active blink jobs are stopped first. Each half-step is one batch so
/// the two LEDs always change together.
pub fn alternation_sweep<C: Clock + ?Sized>(
    scheduler: &BlinkScheduler,
    clock: &C,
    steps: &[Duration],
) -> Result<()> {
    info!("selftest: alternation sweep, {} steps", steps.len());
    for output in Output::ALL {
        scheduler.stop_blink(output);
    }

    let idle = WriteBatch::from_writes(&IDLE_LOOK)?;
    let swapped = WriteBatch::from_writes(&SWAPPED_LOOK)?;
    let writer = scheduler.writer();
    for &step in steps {
        writer.submit(idle.clone());
        clock.sleep(step);
        writer.submit(swapped.clone());
        clock.sleep(step);
    }
    writer.submit(idle);
    Ok(())
}

/// Start the two independent demo jobs. Red stops after three cycles,
/// green runs until replaced.
pub fn dual_blink(scheduler: &BlinkScheduler) -> Result<(BlinkHandle, BlinkHandle)> {
    info!("selftest: dual blink");
    let red = scheduler.start_blink(
        Output::Red,
        Pattern::alternating(&DUAL_RED_SECS)?,
        Repeat::times(DUAL_RED_CYCLES)?,
        None,
    )?;
    let green = scheduler.start_blink(
        Output::Green,
        Pattern::alternating(&DUAL_GREEN_SECS)?,
        Repeat::Forever,
        None,
    )?;
    Ok((red, green))
}

/// Stop both jobs and return to red off, green on.
pub fn restore(scheduler: &BlinkScheduler) {
    info!("selftest: restore");
    scheduler.set_state(Output::Red, false);
    scheduler.set_state(Output::Green, true);
}

/// Route panics through the logger before the default hook runs.
pub fn install_panic_handler() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let reason = if let Some(msg) = info.payload().downcast_ref::<&str>() {
            *msg
        } else if let Some(msg) = info.payload().downcast_ref::<String>() {
            msg.as_str()
        } else {
            "unknown panic"
        };
        let thread = std::thread::current();
        log::error!("PANIC in '{}': {}", thread.name().unwrap_or("unnamed"), reason);
        default_hook(info);
    }));
}
