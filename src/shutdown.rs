//! The terminal action fired once the process tree has gone idle.

use std::process::Command;

use tracing::{error, info};

use crate::error::{Result, WatchError};

/// Irreversible system shutdown. Invoked at most once per run.
pub trait ShutdownAction {
    fn shutdown_now(&mut self) -> Result<()>;
}

/// Powers the machine off through the platform `shutdown` command.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemShutdown;

impl SystemShutdown {
    fn command() -> Command {
        let mut cmd = Command::new("shutdown");
        if cfg!(windows) {
            cmd.args(["/s", "/t", "0"]);
        } else {
            cmd.args(["-h", "now"]);
        }
        cmd
    }
}

impl ShutdownAction for SystemShutdown {
    fn shutdown_now(&mut self) -> Result<()> {
        let mut cmd = Self::command();
        info!(command = ?cmd, "issuing system shutdown");
        let status = cmd.status().map_err(|e| {
            error!(error = %e, "could not run shutdown command");
            WatchError::shutdown(format!("could not run shutdown command: {e}"))
        })?;
        if status.success() {
            Ok(())
        } else {
            error!(%status, "shutdown command failed");
            Err(WatchError::shutdown(format!("shutdown command exited with {status}")))
        }
    }
}

/// Counts invocations instead of shutting anything down.
#[derive(Clone, Debug, Default)]
pub struct RecordingShutdown {
    calls: usize,
    fail: bool,
}

impl RecordingShutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder whose every invocation reports failure.
    pub fn failing() -> Self {
        Self { calls: 0, fail: true }
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl ShutdownAction for RecordingShutdown {
    fn shutdown_now(&mut self) -> Result<()> {
        self.calls += 1;
        if self.fail {
            Err(WatchError::shutdown("recorded failure"))
        } else {
            Ok(())
        }
    }
}
