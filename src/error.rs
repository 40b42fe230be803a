//! Unified error types for holdcmd.
//!
//! A single `Error` enum that every subsystem converts into. All variants
//! are `Copy` so they can cross the writer thread boundary and be logged
//! without allocation.

use core::fmt;
use std::io;

use crate::pins::Output;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid. Fatal, never retried.
    Config(ConfigError),
    /// A hardware LED write failed. Fatal.
    Sink(SinkError),
    /// A worker or blink thread could not be created.
    Spawn(&'static str),
    /// A write batch exceeded its fixed capacity.
    BatchFull,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Sink(e) => write!(f, "sink: {e}"),
            Self::Spawn(name) => write!(f, "failed to spawn thread '{name}'"),
            Self::BatchFull => write!(f, "write batch full"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Output identifier is neither "red" nor "green".
    UnknownOutput,
    /// A pattern has no phases.
    EmptyPattern,
    /// A phase duration is zero, negative, or not finite.
    InvalidPhase,
    /// A repeat count of zero was requested.
    InvalidRepeat,
    /// The config file could not be read or parsed.
    Malformed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOutput => write!(f, "output must be 'red' or 'green'"),
            Self::EmptyPattern => write!(f, "pattern has no phases"),
            Self::InvalidPhase => write!(f, "phase duration must be a positive number of seconds"),
            Self::InvalidRepeat => write!(f, "repeat count must be at least 1"),
            Self::Malformed => write!(f, "config file malformed"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Sink errors
// ---------------------------------------------------------------------------

/// A write + flush to one LED failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkError {
    pub output: Output,
    pub kind: io::ErrorKind,
}

impl SinkError {
    pub fn new(output: Output, err: &io::Error) -> Self {
        Self {
            output,
            kind: err.kind(),
        }
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "write to {} LED failed: {}", self.output, self.kind)
    }
}

impl From<SinkError> for Error {
    fn from(e: SinkError) -> Self {
        Self::Sink(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
