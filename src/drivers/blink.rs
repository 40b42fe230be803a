//! Per-output blink scheduler.
//!
//! Turns a [`Pattern`] into a stream of timed [`WriteBatch`]es on the
//! [`LedWriter`]. Each active job runs on its own thread, driving a small
//! future with `futures_lite::future::block_on`:
//!
//! ```text
//!  start_blink(o) ──▶ slot[o].generation += 1 ──▶ spawn blink-<o>
//!                     old job's cancel signal raised
//!
//!  blink-<o>:   ┌─ cycles ───────────────────────────────┐
//!               │ for phase: lock slot, check generation │
//!               │            submit, unlock              │
//!               │            wait(boundary) | cancel     │
//!               └────────────────────────────────────────┘
//!               ┌─ deadline (optional) ─┐
//!               │ timer, then stop if   │   raced with `or`
//!               │ still current         │
//!               └───────────────────────┘
//! ```
//!
//! ## Timing
//!
//! Phase `i` of cycle `c` ends at `t0 + c·period + so_far[i]`. Waits are
//! computed against that absolute boundary rather than by summing sleeps,
//! so queueing and wake-up latency never accumulate across cycles.
//!
//! ## Replacement
//!
//! Each output has one slot guarded by an async mutex. A job checks its
//! generation and enqueues its write while holding the slot, so once a
//! successor has been installed the superseded job cannot enqueue
//! anything after the successor's writes.

use core::num::NonZeroU32;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::Timer;
use futures_lite::future;
use log::{debug, warn};

use crate::drivers::led_patterns::Pattern;
use crate::drivers::led_writer::{LedWriter, WriteBatch};
use crate::drivers::task_pin::{BLINK_STACK_KB, spawn_named};
use crate::error::{ConfigError, Result};
use crate::pins::Output;

type CancelSignal = Signal<CriticalSectionRawMutex, ()>;

// ── Stop conditions ───────────────────────────────────────────

/// How many full cycles a job runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Forever,
    Times(NonZeroU32),
}

impl Repeat {
    pub fn times(n: u32) -> core::result::Result<Self, ConfigError> {
        NonZeroU32::new(n).map(Self::Times).ok_or(ConfigError::InvalidRepeat)
    }

    fn is_reached(self, cycles: u32) -> bool {
        match self {
            Self::Forever => false,
            Self::Times(n) => cycles >= n.get(),
        }
    }
}

// ── Per-output slot ───────────────────────────────────────────

#[derive(Default)]
struct Slot {
    /// Bumped every time the active job is replaced or stopped.
    generation: u64,
    cancel: Option<Arc<CancelSignal>>,
}

impl Slot {
    /// Retire the active job (if any) and install `next`.
    fn supersede(&mut self, next: Option<Arc<CancelSignal>>) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        if let Some(old) = self.cancel.take() {
            old.signal(());
        }
        self.cancel = next;
        self.generation
    }
}

struct Inner {
    writer: LedWriter,
    slots: [Mutex<CriticalSectionRawMutex, Slot>; Output::COUNT],
}

impl Inner {
    fn slot(&self, output: Output) -> &Mutex<CriticalSectionRawMutex, Slot> {
        &self.slots[output.index()]
    }
}

// ── Scheduler ─────────────────────────────────────────────────

/// Cloneable handle to the blink engine.
#[derive(Clone)]
pub struct BlinkScheduler {
    inner: Arc<Inner>,
}

impl BlinkScheduler {
    pub fn new(writer: LedWriter) -> Self {
        Self {
            inner: Arc::new(Inner {
                writer,
                slots: [Mutex::new(Slot::default()), Mutex::new(Slot::default())],
            }),
        }
    }

    pub fn writer(&self) -> &LedWriter {
        &self.inner.writer
    }

    /// Replace any active job on `output` and start blinking `pattern`.
    ///
    /// Returns as soon as the job thread is running. `stop_after` bounds
    /// the job's lifetime independently of `repeat`; the first limit hit
    /// wins.
    pub fn start_blink(
        &self,
        output: Output,
        pattern: Pattern,
        repeat: Repeat,
        stop_after: Option<Duration>,
    ) -> Result<BlinkHandle> {
        self.start_job(output, pattern, repeat, stop_after, Instant::now())
    }

    /// `started` anchors both the phase boundaries and the deadline.
    fn start_job(
        &self,
        output: Output,
        pattern: Pattern,
        repeat: Repeat,
        stop_after: Option<Duration>,
        started: Instant,
    ) -> Result<BlinkHandle> {
        let cancel = Arc::new(CancelSignal::new());
        let generation = future::block_on(async {
            let mut slot = self.inner.slot(output).lock().await;
            slot.supersede(Some(Arc::clone(&cancel)))
        });

        debug!(
            "blink {}: start gen={} period={:?} repeat={:?} stop_after={:?}",
            output,
            generation,
            pattern.period(),
            repeat,
            stop_after
        );

        let job = BlinkJob {
            inner: Arc::clone(&self.inner),
            output,
            generation,
            pattern,
            repeat,
            started,
            stop_after,
            cancel,
        };
        let thread = spawn_named(thread_name(output), BLINK_STACK_KB, move || job.run())?;

        Ok(BlinkHandle { output, thread })
    }

    /// Stop the active job on `output`. The LED keeps its last state.
    pub fn stop_blink(&self, output: Output) {
        future::block_on(async {
            self.inner.slot(output).lock().await.supersede(None);
        });
    }

    /// Stop blinking and drive `output` to a fixed state. Never waits on
    /// the writer.
    pub fn set_state(&self, output: Output, on: bool) {
        future::block_on(async {
            let mut slot = self.inner.slot(output).lock().await;
            slot.supersede(None);
            self.inner.writer.submit(WriteBatch::single(output, on));
        });
    }
}

fn thread_name(output: Output) -> &'static str {
    match output {
        Output::Red => "blink-red",
        Output::Green => "blink-green",
    }
}

// ── Job handle ────────────────────────────────────────────────

/// Handle to a started job. Dropping it detaches the job.
pub struct BlinkHandle {
    output: Output,
    thread: JoinHandle<()>,
}

impl BlinkHandle {
    pub fn output(&self) -> Output {
        self.output
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Block until the job has ended (limit reached, deadline, or replaced).
    pub fn wait(self) {
        if self.thread.join().is_err() {
            warn!("blink {}: job thread panicked", self.output);
        }
    }
}

// ── Job ───────────────────────────────────────────────────────

struct BlinkJob {
    inner: Arc<Inner>,
    output: Output,
    generation: u64,
    pattern: Pattern,
    repeat: Repeat,
    started: Instant,
    stop_after: Option<Duration>,
    cancel: Arc<CancelSignal>,
}

impl BlinkJob {
    fn run(self) {
        match self.stop_after {
            Some(limit) => future::block_on(future::or(self.cycles(), self.deadline(limit))),
            None => future::block_on(self.cycles()),
        }
        debug!("blink {}: gen={} ended", self.output, self.generation);
    }

    async fn cycles(&self) {
        let period = self.pattern.period();
        let t0 = self.started;
        let mut cycles: u32 = 0;

        loop {
            let mut boundary = t0 + period * cycles;
            for phase in self.pattern.phases() {
                if !self.emit(phase.on).await {
                    return;
                }
                boundary += phase.duration;
                let wait = boundary.saturating_duration_since(Instant::now());
                if self.wait_or_cancel(wait).await {
                    return;
                }
            }
            cycles = cycles.saturating_add(1);
            if self.repeat.is_reached(cycles) {
                return;
            }
        }
    }

    /// Cancel this job once `limit` has elapsed since the start call,
    /// unless it was already replaced.
    async fn deadline(&self, limit: Duration) {
        let remaining = (self.started + limit).saturating_duration_since(Instant::now());
        Timer::after(to_timer_duration(remaining)).await;
        let mut slot = self.inner.slot(self.output).lock().await;
        if slot.generation == self.generation {
            debug!("blink {}: gen={} deadline {:?} reached", self.output, self.generation, limit);
            slot.supersede(None);
        }
    }

    /// Enqueue one phase write. Returns `false` if this job is no longer
    /// the active one.
    async fn emit(&self, on: bool) -> bool {
        let slot = self.inner.slot(self.output).lock().await;
        if slot.generation != self.generation {
            return false;
        }
        self.inner.writer.submit(WriteBatch::single(self.output, on));
        true
    }

    /// Wait for `wait`, or less if cancelled. Returns `true` on cancel.
    async fn wait_or_cancel(&self, wait: Duration) -> bool {
        future::or(
            async {
                Timer::after(to_timer_duration(wait)).await;
                false
            },
            async {
                self.cancel.wait().await;
                true
            },
        )
        .await
    }
}

fn to_timer_duration(d: Duration) -> embassy_time::Duration {
    embassy_time::Duration::from_micros(u64::try_from(d.as_micros()).unwrap_or(u64::MAX))
}
