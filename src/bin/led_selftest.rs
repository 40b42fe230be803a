//! LED self-test.
//!
//! Walks both LEDs through the alternation sweep, then the dual blink
//! demo, pausing for Enter between stages, and finally restores the idle
//! look (red off, green on).
//!
//! Usage: `led-selftest [config.json]`. Only the LED paths are used.

#![deny(unused_must_use)]

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use log::info;

use holdcmd::adapters::sysfs_led::SysfsLeds;
use holdcmd::adapters::time::MonotonicClock;
use holdcmd::config::{DEFAULT_CONFIG_FILE, SystemConfig};
use holdcmd::diagnostics;
use holdcmd::drivers::blink::BlinkScheduler;
use holdcmd::drivers::led_writer::LedWriter;
use holdcmd::logging;

fn wait_for_enter(prompt: &str) -> Result<()> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("reading stdin")?;
    Ok(())
}

fn main() -> Result<()> {
    logging::init_logging();
    diagnostics::install_panic_handler();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_FILE.into());
    let config = SystemConfig::load(&config_path).with_context(|| format!("loading {config_path}"))?;

    let leds = SysfsLeds::open(&config.red_led, &config.green_led).context("opening LED brightness files")?;
    let writer = LedWriter::spawn(leds).context("starting LED writer")?;
    let scheduler = BlinkScheduler::new(writer.clone());
    let clock = MonotonicClock::new();

    diagnostics::alternation_sweep(&scheduler, &clock, &diagnostics::sweep_steps()).context("alternation sweep")?;
    wait_for_enter("Sweep done. Press Enter for the dual blink...")?;

    // Held until restore() supersedes both jobs.
    let _jobs = diagnostics::dual_blink(&scheduler).context("starting dual blink")?;
    wait_for_enter("Blinking. Press Enter to restore...")?;

    diagnostics::restore(&scheduler);
    writer.wait_drained();
    info!("selftest finished after {}s", clock.uptime_secs());
    Ok(())
}
