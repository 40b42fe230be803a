//! Application core boundary.
//!
//! The command type the decoder resolves and the **port traits** through
//! which the core reaches hardware, time, and the command runner. The
//! core is testable on the host with mock adapters.

pub mod commands;
pub mod ports;
