//! holdcmd: main entry point
//!
//! Hold the button N seconds, the status LED flashes N times, then line N
//! of the command list runs.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  ButtonInput      SysfsLeds      MonotonicClock  CommandList │
//! │  (evdev edges)    (LedSink)      (Clock)         (Executor)  │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │   PressDecoder ──▶ BlinkScheduler ──▶ LedWriter (worker)     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `holdcmd [config.json]` (default `holdcmd.json`).

#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::{info, warn};

use holdcmd::adapters::command_list::CommandList;
use holdcmd::adapters::input::ButtonInput;
use holdcmd::adapters::sysfs_led::SysfsLeds;
use holdcmd::adapters::time::MonotonicClock;
use holdcmd::config::{DEFAULT_CONFIG_FILE, SystemConfig};
use holdcmd::diagnostics;
use holdcmd::drivers::blink::BlinkScheduler;
use holdcmd::drivers::led_writer::LedWriter;
use holdcmd::fsm::decoder::PressDecoder;
use holdcmd::logging;

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    logging::init_logging();
    diagnostics::install_panic_handler();
    info!("holdcmd v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration (fatal when invalid) ─────────────────
    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_FILE.into());
    let config = SystemConfig::load(&config_path).with_context(|| format!("loading {config_path}"))?;
    let decoder_config = config.decoder_config().context("building decoder config")?;
    info!(
        "status LED: {}, command list: {}",
        decoder_config.status_output,
        config.command_list.display()
    );

    // ── 3. LED pipeline ───────────────────────────────────────
    let leds = SysfsLeds::open(&config.red_led, &config.green_led).context("opening LED brightness files")?;
    let writer = LedWriter::spawn(leds).context("starting LED writer")?;
    let scheduler = BlinkScheduler::new(writer);
    scheduler.set_state(decoder_config.status_output, false);

    // ── 4. Decoder ────────────────────────────────────────────
    let decoder = PressDecoder::new(
        scheduler,
        MonotonicClock::new(),
        CommandList::new(&config.command_list),
        decoder_config,
    );

    // ── 5. Input loop ─────────────────────────────────────────
    let mut input = ButtonInput::open(&config.input_device)
        .with_context(|| format!("opening input device {}", config.input_device.display()))?;
    info!("System ready. Waiting for button presses.");

    input
        .run(|edge| {
            if let Err(e) = decoder.handle_edge(edge) {
                warn!("press: {:?} edge failed: {}", edge, e);
            }
        })
        .context("reading input device")
}
