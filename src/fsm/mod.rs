//! Press-duration state machine.
//!
//! ```text
//!  IDLE ──[down]──▶ HELD ──[up]──▶ DECIDING ──[command ≥ 1, pause]──▶ CONFIRMING
//!    ▲                                │                                  │
//!    │                          [command = 0]                  [flashes done,
//!    │                                │                         executor called]
//!    └────────────────────────────────┴──────────────────────────────────┘
//! ```
//!
//! The transitions themselves live in [`decoder::PressDecoder`]; this
//! module defines the state and edge vocabulary shared with the input
//! adapter.

pub mod decoder;

use std::time::Instant;

use crate::app::commands::Command;

/// A raw button edge from the input collaborator. No payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEdge {
    Down,
    Up,
}

/// Decoder state. At most one press session (the `Held` start) exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressState {
    /// No open press session.
    Idle,
    /// Button down since `since` (monotonic).
    Held { since: Instant },
    /// Released; command resolved, pre-confirmation pause running.
    Deciding(Command),
    /// Confirmation flashes running, executor called after.
    Confirming(Command),
}

impl PressState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Held { .. } => "Held",
            Self::Deciding(_) => "Deciding",
            Self::Confirming(_) => "Confirming",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
