use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{CommandOutput, RemoteSession, RemoteShell};
use crate::attack::WorkerEndpoint;
use crate::error::RemoteError;

/// Exit status the OpenSSH client uses for its own failures.
const SSH_CLIENT_FAILURE: i32 = 255;
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection parameters shared by every session.
#[derive(Debug, Clone)]
pub struct SshSettings {
    pub username: String,
    /// Directory holding `<credential_ref>.pem` keys.
    pub key_dir: PathBuf,
    pub connect_timeout: Duration,
    pub command_timeout: Option<Duration>,
}

impl SshSettings {
    #[must_use]
    pub fn new(username: &str, key_dir: PathBuf) -> Self {
        Self {
            username: username.to_owned(),
            key_dir,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            command_timeout: None,
        }
    }

    pub(crate) fn key_path(&self, credential_ref: &str) -> Option<PathBuf> {
        let name = credential_ref.trim();
        if name.is_empty() {
            return None;
        }
        if Path::new(name).extension().is_some() {
            return Some(self.key_dir.join(name));
        }
        Some(self.key_dir.join(format!("{}.pem", name)))
    }

    /// Options common to `ssh` and `scp`.
    pub(crate) fn common_args(&self, credential_ref: &str) -> Vec<String> {
        let mut args = vec![
            "-o".to_owned(),
            "BatchMode=yes".to_owned(),
            "-o".to_owned(),
            "StrictHostKeyChecking=no".to_owned(),
            "-o".to_owned(),
            "UserKnownHostsFile=/dev/null".to_owned(),
            "-o".to_owned(),
            format!("ConnectTimeout={}", self.connect_timeout.as_secs().max(1)),
        ];
        if let Some(key) = self.key_path(credential_ref) {
            args.push("-i".to_owned());
            args.push(key.display().to_string());
        }
        args
    }

    pub(crate) fn destination(&self, address: &str) -> String {
        if self.username.is_empty() {
            address.to_owned()
        } else {
            format!("{}@{}", self.username, address)
        }
    }

    pub(crate) fn ssh_args(&self, endpoint: &WorkerEndpoint, command: &str) -> Vec<String> {
        let mut args = self.common_args(&endpoint.credential_ref);
        args.push(self.destination(&endpoint.address));
        args.push(command.to_owned());
        args
    }

    pub(crate) fn scp_args(&self, endpoint: &WorkerEndpoint, local: &Path, remote_name: &str) -> Vec<String> {
        let mut args = self.common_args(&endpoint.credential_ref);
        args.push(local.display().to_string());
        args.push(format!("{}:{}", self.destination(&endpoint.address), remote_name));
        args
    }
}

/// [`RemoteShell`] backed by the system `ssh` and `scp` binaries.
#[derive(Debug, Clone)]
pub struct OpenSshShell {
    settings: SshSettings,
}

impl OpenSshShell {
    #[must_use]
    pub const fn new(settings: SshSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl RemoteShell for OpenSshShell {
    async fn open(&self, endpoint: &WorkerEndpoint) -> Result<Box<dyn RemoteSession>, RemoteError> {
        let session = OpenSshSession {
            settings: self.settings.clone(),
            endpoint: endpoint.clone(),
            closed: false,
        };
        // Check once so unreachable bees fail here rather than mid-attack.
        let check = session
            .exec(
                "ssh",
                &session.settings.ssh_args(endpoint, "true"),
                Some(self.settings.connect_timeout),
            )
            .await
            .map_err(|err| match err {
                RemoteError::CommandTimeout { address, timeout_ms } => {
                    RemoteError::ConnectTimeout { address, timeout_ms }
                }
                RemoteError::Connect { .. }
                | RemoteError::ConnectTimeout { .. }
                | RemoteError::Spawn { .. }
                | RemoteError::Upload { .. }
                | RemoteError::UploadMissingFileName { .. }
                | RemoteError::SessionClosed { .. } => err,
            })?;
        if !check.success() {
            return Err(RemoteError::Connect {
                address: endpoint.address.clone(),
                message: check.stderr.trim().to_owned(),
            });
        }
        debug!(bee = %endpoint.id, address = %endpoint.address, "Session opened");
        Ok(Box::new(session))
    }
}

struct OpenSshSession {
    settings: SshSettings,
    endpoint: WorkerEndpoint,
    closed: bool,
}

impl OpenSshSession {
    fn ensure_open(&self) -> Result<(), RemoteError> {
        if self.closed {
            return Err(RemoteError::SessionClosed {
                address: self.endpoint.address.clone(),
            });
        }
        Ok(())
    }

    async fn exec(
        &self,
        program: &'static str,
        args: &[String],
        timeout: Option<Duration>,
    ) -> Result<CommandOutput, RemoteError> {
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| RemoteError::Spawn {
                program,
                source: err,
            })?;

        let output = match timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_elapsed| RemoteError::CommandTimeout {
                    address: self.endpoint.address.clone(),
                    timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                })?,
            None => child.wait_with_output().await,
        }
        .map_err(|err| RemoteError::Spawn {
            program,
            source: err,
        })?;

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        };
        if result.exit_code == Some(SSH_CLIENT_FAILURE) {
            return Err(RemoteError::Connect {
                address: self.endpoint.address.clone(),
                message: result.stderr.trim().to_owned(),
            });
        }
        Ok(result)
    }
}

#[async_trait]
impl RemoteSession for OpenSshSession {
    async fn run(&mut self, command: &str) -> Result<CommandOutput, RemoteError> {
        self.ensure_open()?;
        let args = self.settings.ssh_args(&self.endpoint, command);
        self.exec("ssh", &args, self.settings.command_timeout).await
    }

    async fn upload(&mut self, local: &Path) -> Result<String, RemoteError> {
        self.ensure_open()?;
        let remote_name = local
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| RemoteError::UploadMissingFileName {
                path: local.to_path_buf(),
            })?;
        let args = self.settings.scp_args(&self.endpoint, local, &remote_name);
        let output = self
            .exec("scp", &args, self.settings.command_timeout)
            .await
            .map_err(|err| match err {
                RemoteError::Connect { address, message } => RemoteError::Upload {
                    path: local.to_path_buf(),
                    address,
                    message,
                },
                RemoteError::ConnectTimeout { .. }
                | RemoteError::Spawn { .. }
                | RemoteError::CommandTimeout { .. }
                | RemoteError::Upload { .. }
                | RemoteError::UploadMissingFileName { .. }
                | RemoteError::SessionClosed { .. } => err,
            })?;
        if !output.success() {
            return Err(RemoteError::Upload {
                path: local.to_path_buf(),
                address: self.endpoint.address.clone(),
                message: output.stderr.trim().to_owned(),
            });
        }
        Ok(remote_name)
    }

    async fn close(&mut self) -> Result<(), RemoteError> {
        self.ensure_open()?;
        // Every command is its own ssh process, so closing only retires the handle.
        self.closed = true;
        Ok(())
    }
}
