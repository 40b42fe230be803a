//! Resolved hold commands.
//!
//! A [`Command`] is the 1-based index an operator selects by holding the
//! button: one whole second per step. It is handed to the
//! [`CommandExecutor`](super::ports::CommandExecutor) port, which pairs it
//! with a line of the command list.

use core::fmt;
use core::num::NonZeroU32;
use core::time::Duration;

/// A 1-based command index. "No command" (index 0) is `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Command(NonZeroU32);

impl Command {
    /// Map a hold duration to a command: whole seconds, truncated.
    /// Holds shorter than one second select nothing.
    pub fn from_hold(held: Duration) -> Option<Self> {
        let secs = u32::try_from(held.as_secs()).unwrap_or(u32::MAX);
        NonZeroU32::new(secs).map(Self)
    }

    pub fn new(index: u32) -> Option<Self> {
        NonZeroU32::new(index).map(Self)
    }

    /// 1-based index as shown to the operator.
    pub fn index(self) -> u32 {
        self.0.get()
    }

    /// The index as a non-zero count, e.g. for confirmation flashes.
    pub fn count(self) -> NonZeroU32 {
        self.0
    }

    /// 0-based line number in the command list.
    pub fn line(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
