//! Press decoder: maps hold duration to a command.
//!
//! Consumes press-down / press-up edges, measures the hold with the
//! injected [`Clock`], drives the status LED through the
//! [`BlinkScheduler`], flashes the selected number and hands the command
//! to the [`CommandExecutor`].
//!
//! Edges may arrive on any thread. The state lives behind a mutex; the
//! pause and the confirmation wait run outside it, with the state parked
//! in `Deciding` / `Confirming` so stray edges are ignored rather than
//! corrupting the session.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, info};

use crate::app::commands::Command;
use crate::app::ports::{Clock, CommandExecutor};
use crate::drivers::blink::{BlinkScheduler, Repeat};
use crate::drivers::led_patterns::Pattern;
use crate::error::Result;
use crate::pins::Output;

use super::{ButtonEdge, PressState};

/// Default pause between release and the first confirmation flash.
pub const CONFIRM_PAUSE: Duration = Duration::from_secs(1);

/// Validated decoder settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// LED used for all press feedback.
    pub status_output: Output,
    /// Shown while the button is held.
    pub armed_pattern: Pattern,
    /// Flashed once per selected command.
    pub confirm_pattern: Pattern,
    /// Pause after release before confirming.
    pub confirm_pause: Duration,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            status_output: Output::Red,
            armed_pattern: Pattern::armed(),
            confirm_pattern: Pattern::confirm(),
            confirm_pause: CONFIRM_PAUSE,
        }
    }
}

pub struct PressDecoder<C, E> {
    scheduler: BlinkScheduler,
    clock: C,
    executor: Mutex<E>,
    config: DecoderConfig,
    state: Mutex<PressState>,
}

impl<C: Clock, E: CommandExecutor> PressDecoder<C, E> {
    pub fn new(scheduler: BlinkScheduler, clock: C, executor: E, config: DecoderConfig) -> Self {
        Self {
            scheduler,
            clock,
            executor: Mutex::new(executor),
            config,
            state: Mutex::new(PressState::Idle),
        }
    }

    pub fn state(&self) -> PressState {
        *self.lock_state()
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &BlinkScheduler {
        &self.scheduler
    }

    /// Feed one edge. Returns the command executed by a completed
    /// release, if any.
    pub fn handle_edge(&self, edge: ButtonEdge) -> Result<Option<Command>> {
        match edge {
            ButtonEdge::Down => self.on_press().map(|()| None),
            ButtonEdge::Up => self.on_release(),
        }
    }

    /// Idle → Held: open a session and show the armed pattern.
    pub fn on_press(&self) -> Result<()> {
        let mut state = self.lock_state();
        if !state.is_idle() {
            debug!("press: down ignored in {}", state.name());
            return Ok(());
        }

        let since = self.clock.now();
        // The handle is dropped: the armed job runs until the release replaces it.
        self.scheduler.start_blink(
            self.config.status_output,
            self.config.armed_pattern.clone(),
            Repeat::Forever,
            None,
        )?;
        transition(&mut state, PressState::Held { since });
        Ok(())
    }

    /// Held → Deciding → (Confirming →) Idle.
    ///
    /// Blocks through the pause and the confirmation flashes, then runs
    /// the executor on the calling thread.
    pub fn on_release(&self) -> Result<Option<Command>> {
        let command = {
            let mut state = self.lock_state();
            let PressState::Held { since } = *state else {
                debug!("press: up ignored in {}", state.name());
                return Ok(None);
            };

            let held = self.clock.now().saturating_duration_since(since);
            self.scheduler.set_state(self.config.status_output, false);
            let command = Command::from_hold(held);
            info!(
                "pressed for: {:.2}s command: {}",
                held.as_secs_f64(),
                command.map_or(0, Command::index)
            );

            match command {
                Some(command) => {
                    transition(&mut state, PressState::Deciding(command));
                    command
                }
                None => {
                    transition(&mut state, PressState::Idle);
                    return Ok(None);
                }
            }
        };

        let result = self.confirm(command);
        transition(&mut self.lock_state(), PressState::Idle);
        result.map(|()| Some(command))
    }

    fn confirm(&self, command: Command) -> Result<()> {
        self.clock.sleep(self.config.confirm_pause);
        transition(&mut self.lock_state(), PressState::Confirming(command));

        let flashes = self.scheduler.start_blink(
            self.config.status_output,
            self.config.confirm_pattern.clone(),
            Repeat::Times(command.count()),
            None,
        )?;
        flashes.wait();

        self.executor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .execute(command);
        Ok(())
    }

    fn lock_state(&self) -> MutexGuard<'_, PressState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn transition(state: &mut PressState, next: PressState) {
    debug!("press: {} -> {}", state.name(), next.name());
    *state = next;
}
