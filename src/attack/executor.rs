use tracing::{debug, info, warn};

use super::command::shell_quote;
use super::options::AttackJobSpec;
use super::output::{CANNOT_CONNECT_SIGNATURE, parse_benchmark_output, parse_timing_csv};
use super::result::{TimeoutReason, WorkerResult};
use crate::error::{AppResult, RemoteError};
use crate::remote::{RemoteSession, RemoteShell};

/// Default command that installs the benchmark tool on a fresh bee.
pub const DEFAULT_INSTALL_COMMAND: &str = "sudo yum install httpd-tools -y";

/// Per-run settings for the remote side of an attack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorSettings {
    /// Runs once per session before the benchmark; `None` skips the step.
    pub install_command: Option<String>,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            install_command: Some(DEFAULT_INSTALL_COMMAND.to_owned()),
        }
    }
}

impl ExecutorSettings {
    /// Settings with an explicit install command; blank disables the step.
    #[must_use]
    pub fn with_install_command(command: &str) -> Self {
        let command = command.trim();
        Self {
            install_command: (!command.is_empty()).then(|| command.to_owned()),
        }
    }
}

/// Runs one bee's share of the attack and turns every per-worker failure
/// into a [`WorkerResult`].
///
/// # Errors
///
/// Only remote errors that are neither connection-level nor a stalled
/// command escape; the coordinator records those as transport failures.
pub async fn execute_job(
    shell: &dyn RemoteShell,
    job: &AttackJobSpec,
    settings: &ExecutorSettings,
) -> AppResult<WorkerResult> {
    let bee = job.endpoint.id.as_str();
    let mut session = match shell.open(&job.endpoint).await {
        Ok(session) => session,
        Err(err) => return absorb(bee, err),
    };
    info!(bee = %bee, index = job.index, "Bee {} is joining the swarm.", job.index);

    let outcome = run_session(session.as_mut(), job, settings).await;
    if let Err(err) = session.close().await {
        debug!(bee = %bee, "Closing session failed: {}", err);
    }

    match outcome {
        Ok(result) => {
            if result.is_success() {
                info!(bee = %bee, index = job.index, "Bee {} is out of ammo.", job.index);
            }
            Ok(result)
        }
        Err(err) => absorb(bee, err),
    }
}

async fn run_session(
    session: &mut dyn RemoteSession,
    job: &AttackJobSpec,
    settings: &ExecutorSettings,
) -> Result<WorkerResult, RemoteError> {
    let bee = job.endpoint.id.as_str();

    let temp = session.run("mktemp").await?;
    let csv_path = temp.stdout.trim();
    if csv_path.is_empty() {
        warn!(bee = %bee, "Bee {} lost sight of the target (connection timed out creating csv_filename).", job.index);
        return Ok(WorkerResult::Timeout {
            reason: TimeoutReason::NoTempFile,
        });
    }

    let remote_payload = match job.post_file.as_deref() {
        Some(path) => {
            let name = session.upload(path).await?;
            Some(format!("~/{}", shell_quote(&name)))
        }
        None => None,
    };

    if let Some(install) = settings.install_command.as_deref() {
        match session.run(install).await {
            Ok(output) if !output.success() => {
                warn!(bee = %bee, "Installing the benchmark tool failed: {}", output.stderr.trim());
            }
            Ok(_) => {}
            Err(err) if err.is_connection_level() => return Err(err),
            Err(err) => warn!(bee = %bee, "Installing the benchmark tool failed: {}", err),
        }
    }

    info!(bee = %bee, "Bee {} is firing her machine gun. Bang bang!", job.index);
    let command = job.benchmark_command(csv_path, remote_payload.as_deref());
    debug!(bee = %bee, command = %command, "Running benchmark");
    let benchmark = session.run(&command).await?;
    let Some(metrics) = parse_benchmark_output(&benchmark.stdout) else {
        warn!(bee = %bee, "Bee {} lost sight of the target (connection timed out running ab).", job.index);
        let reason = if benchmark.stdout.contains(CANNOT_CONNECT_SIGNATURE) {
            TimeoutReason::TargetRefused
        } else {
            TimeoutReason::MissingMeanTimePerRequest
        };
        return Ok(WorkerResult::Timeout { reason });
    };

    let csv = session.run(&format!("cat {}", shell_quote(csv_path))).await?;
    let raw_sample_times = parse_timing_csv(&csv.stdout);
    if raw_sample_times.is_empty() {
        warn!(bee = %bee, "Bee {} lost sight of the target (connection timed out reading csv).", job.index);
        return Ok(WorkerResult::Timeout {
            reason: TimeoutReason::EmptyTimingCsv,
        });
    }

    Ok(WorkerResult::Success {
        metrics,
        raw_sample_times,
    })
}

/// Folds a remote error into the result list, or passes it on.
fn absorb(bee: &str, err: RemoteError) -> AppResult<WorkerResult> {
    if matches!(err, RemoteError::CommandTimeout { .. }) {
        warn!(bee = %bee, "{}", err);
        return Ok(WorkerResult::Timeout {
            reason: TimeoutReason::CommandStalled,
        });
    }
    if err.is_connection_level() {
        warn!(bee = %bee, "{}", err);
        return Ok(WorkerResult::TransportFailure {
            cause: err.to_string(),
        });
    }
    Err(err.into())
}
