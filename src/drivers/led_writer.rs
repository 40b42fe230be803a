//! Serialized LED writer.
//!
//! A single worker thread owns the [`LedSink`] and applies
//! [`WriteBatch`]es in submission order. Every producer (blink jobs, the
//! decoder, diagnostics) goes through the same queue, so writes are
//! totally ordered and two batches never interleave.
//!
//! ```text
//! ┌──────────────┐
//! │ blink-red    │──┐
//! │ blink-green  │──┤  WriteBatch  ┌────────────┐   write+flush  ┌─────────┐
//! │ decoder      │──┼────────────▶│ led-writer │──────────────▶│ LedSink │
//! │ diagnostics  │──┘  (ordered)   └────────────┘                └─────────┘
//! └──────────────┘
//! ```
//!
//! The queue is unbounded: [`LedWriter::submit`] never waits, so a slow
//! sink can delay the LEDs but never a producer.
//!
//! A failed write is fatal: the LEDs are the operator's only sign of life,
//! so the worker logs the error and exits the process.

use std::sync::{Arc, Condvar, Mutex, PoisonError};

use async_channel::{Receiver, Sender};
use futures_lite::future;
use log::{error, info, warn};

use crate::app::ports::LedSink;
use crate::drivers::task_pin::{WRITER_STACK_KB, spawn_named};
use crate::error::{Error, Result, SinkError};
use crate::pins::Output;

/// Maximum (output, state) pairs in a single batch.
pub const MAX_BATCH_WRITES: usize = 8;

// ── Write batch ───────────────────────────────────────────────

/// Ordered writes applied back-to-back by the worker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    writes: heapless::Vec<(Output, bool), MAX_BATCH_WRITES>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A one-pair batch.
    pub fn single(output: Output, on: bool) -> Self {
        Self {
            writes: core::iter::once((output, on)).collect(),
        }
    }

    pub fn from_writes(writes: &[(Output, bool)]) -> Result<Self> {
        let mut batch = Self::new();
        for &(output, on) in writes {
            batch.push(output, on)?;
        }
        Ok(batch)
    }

    pub fn push(&mut self, output: Output, on: bool) -> Result<()> {
        self.writes.push((output, on)).map_err(|_| Error::BatchFull)
    }

    pub fn writes(&self) -> &[(Output, bool)] {
        &self.writes
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

// ── Shared queue state ────────────────────────────────────────

struct Shared {
    tx: Sender<WriteBatch>,
    rx: Receiver<WriteBatch>,
    /// Batches submitted but not yet fully applied.
    pending: Mutex<u64>,
    drained: Condvar,
}

impl Shared {
    fn new() -> Self {
        let (tx, rx) = async_channel::unbounded();
        Self {
            tx,
            rx,
            pending: Mutex::new(0),
            drained: Condvar::new(),
        }
    }

    fn begin(&self) {
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }

    fn complete(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.drained.notify_all();
        }
    }
}

// ── Writer handle ─────────────────────────────────────────────

/// Cloneable handle to the serialized writer.
#[derive(Clone)]
pub struct LedWriter {
    shared: Arc<Shared>,
}

impl LedWriter {
    /// Start the worker thread. The sink is owned by the worker for the
    /// rest of the process lifetime.
    pub fn spawn<S: LedSink + Send + 'static>(sink: S) -> Result<Self> {
        let shared = Arc::new(Shared::new());
        let worker = Arc::clone(&shared);

        spawn_named("led-writer", WRITER_STACK_KB, move || {
            if let Err(e) = run_worker(&worker, sink) {
                error!("LED writer halted: {}, terminating", e);
                std::process::exit(1);
            }
        })?;

        Ok(Self { shared })
    }

    /// Enqueue a batch. Never waits.
    pub fn submit(&self, batch: WriteBatch) {
        if batch.is_empty() {
            return;
        }
        self.shared.begin();
        if let Err(e) = self.shared.tx.try_send(batch) {
            warn!("LED writer queue closed, batch {:?} dropped", e.into_inner().writes());
            self.shared.complete();
        }
    }

    /// Block until every batch submitted so far has been applied.
    pub fn wait_drained(&self) {
        let mut pending = self.shared.pending.lock().unwrap_or_else(PoisonError::into_inner);
        while *pending > 0 {
            pending = self
                .shared
                .drained
                .wait(pending)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Number of batches submitted but not yet applied.
    pub fn pending(&self) -> u64 {
        *self.shared.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Worker ────────────────────────────────────────────────────

/// Pull batches until the queue closes; returns early on a sink failure.
fn run_worker<S: LedSink>(shared: &Shared, mut sink: S) -> Result<()> {
    info!("LED writer started");
    while let Ok(batch) = future::block_on(shared.rx.recv()) {
        apply_batch(&mut sink, &batch)?;
        shared.complete();
    }
    Ok(())
}

/// Apply each pair in order; the sink flushes before returning.
fn apply_batch<S: LedSink>(sink: &mut S, batch: &WriteBatch) -> core::result::Result<(), SinkError> {
    for &(output, on) in batch.writes() {
        sink.write(output, on)?;
    }
    Ok(())
}
