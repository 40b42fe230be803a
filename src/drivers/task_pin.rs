//! Named thread spawning for the writer worker and blink jobs.
//!
//! Every long-lived or per-job thread goes through [`spawn_named`] so
//! threads show up with a recognisable name in `ps -T` / `top -H` and
//! share one stack-size policy.

use std::thread::JoinHandle;

use crate::error::{Error, Result};

/// Stack for the writer worker: one batch and a sink write at a time.
pub const WRITER_STACK_KB: usize = 64;

/// Stack for a blink job: a single-future executor and its timers.
pub const BLINK_STACK_KB: usize = 64;

/// Spawn a named thread with an explicit stack size.
///
/// `name` is static so it can also be carried in [`Error::Spawn`].
pub fn spawn_named(
    name: &'static str,
    stack_kb: usize,
    f: impl FnOnce() + Send + 'static,
) -> Result<JoinHandle<()>> {
    log::debug!("Spawning '{}' (stack={}KB)", name, stack_kb);

    std::thread::Builder::new()
        .name(name.into())
        .stack_size(stack_kb * 1024)
        .spawn(f)
        .map_err(|e| {
            log::error!("thread '{}' creation failed: {}", name, e);
            Error::Spawn(name)
        })
}
