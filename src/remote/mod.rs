//! Remote execution capability used to drive the bees.
//!
//! The attack core only sees [`RemoteShell`] and [`RemoteSession`]; the
//! OpenSSH implementation lives in [`ssh`], and tests substitute in-memory
//! fakes.

mod ssh;

#[cfg(test)]
mod tests;

use std::path::Path;

use async_trait::async_trait;

use crate::attack::WorkerEndpoint;
use crate::error::RemoteError;

pub use ssh::{OpenSshShell, SshSettings};

/// Captured output of one remote command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit status, when the command ran to completion.
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Opens sessions to bees.
#[async_trait]
pub trait RemoteShell: Send + Sync {
    /// Connects to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns a connection-level [`RemoteError`] when the bee is unreachable.
    async fn open(&self, endpoint: &WorkerEndpoint) -> Result<Box<dyn RemoteSession>, RemoteError>;
}

/// One live session with a bee. Sessions are never shared between tasks.
#[async_trait]
pub trait RemoteSession: Send {
    /// Runs `command` through the remote login shell.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::CommandTimeout`] when the command outlives its
    /// deadline, or a connection-level error when the session drops.
    async fn run(&mut self, command: &str) -> Result<CommandOutput, RemoteError>;

    /// Copies `local` into the remote home directory and returns the remote
    /// file name.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Upload`] when the copy fails.
    async fn upload(&mut self, local: &Path) -> Result<String, RemoteError>;

    /// Releases the session. Closing twice is an error.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::SessionClosed`] when already closed.
    async fn close(&mut self) -> Result<(), RemoteError>;
}
