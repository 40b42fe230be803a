//! holdcmd library.
//!
//! Press-duration command selection with LED feedback: hold the button
//! N seconds, the status LED confirms with N flashes, then line N of the
//! command list runs. Hardware access sits behind the port traits in
//! [`app::ports`] so everything here runs on the host in tests.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod logging;
pub mod pins;

pub use error::{ConfigError, Error, Result, SinkError};
