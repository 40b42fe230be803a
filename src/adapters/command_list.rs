//! Command list adapter.
//!
//! Implements [`CommandExecutor`]: command `n` runs line `n` (1-based) of
//! a plain text file through `sh -c`. The file is read on every execution
//! so it can be edited while the daemon runs. The child is waited for and
//! its exit status logged; a failing command never stops the daemon.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command as Process;

use log::{info, warn};

use crate::app::commands::Command;
use crate::app::ports::CommandExecutor;

pub struct CommandList {
    path: PathBuf,
}

impl CommandList {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Line for `command`, or `None` when the file is shorter.
    pub fn lookup(&self, command: Command) -> io::Result<Option<String>> {
        let text = std::fs::read_to_string(&self.path)?;
        Ok(text.lines().nth(command.line()).map(str::to_owned))
    }
}

impl CommandExecutor for CommandList {
    fn execute(&mut self, command: Command) {
        let line = match self.lookup(command) {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("command {}: no such line in {}", command, self.path.display());
                return;
            }
            Err(e) => {
                warn!("command {}: cannot read {}: {}", command, self.path.display(), e);
                return;
            }
        };

        if line.trim().is_empty() {
            info!("command {}: empty line, nothing to run", command);
            return;
        }

        info!("command {}: running `{}`", command, line);
        match Process::new("sh").arg("-c").arg(&line).status() {
            Ok(status) if status.success() => info!("command {}: done", command),
            Ok(status) => warn!("command {}: exited with {}", command, status),
            Err(e) => warn!("command {}: failed to start: {}", command, e),
        }
    }
}
