//! Distributed attack core: plan the jobs, warm the target, fan the
//! benchmark out to every bee and fold the results into one report.

mod aggregate;
mod command;
mod coordinator;
mod executor;
mod options;
mod output;
mod report;
mod result;
mod sting;


use std::path::Path;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

pub use aggregate::{
    AggregateReport, CDF_POINTS, CompletedBee, FailedBee, MeanResponse, TimedOutBee, aggregate,
    evaluate_thresholds,
};
pub use command::{JobPlan, LoadShare, PlanWarning, build_job, build_jobs, shell_quote, validate_load};
pub use coordinator::{dispatch, dispatch_with_pool_size};
pub use executor::{DEFAULT_INSTALL_COMMAND, ExecutorSettings, execute_job};
pub use options::{AttackJobSpec, AttackOptions, PrimingMode, Thresholds, WorkerEndpoint};
pub use report::{
    VERDICT_ACCEPTED, VERDICT_REJECTED, mission_assessment, render_csv, render_lines,
    verdict_line, write_csv,
};
pub use result::{BenchmarkMetrics, FailedRequests, StatusHistogram, TimeoutReason, WorkerResult};
pub use sting::prime_targets;

use crate::error::{AppResult, AttackError};
use crate::remote::RemoteShell;

/// Runs a full attack against the given bees.
///
/// Nothing remote happens until the load is validated, the CSV target is
/// writable and the payload is readable.
///
/// # Errors
///
/// Returns an error for invalid load parameters, an unwritable CSV path, an
/// unreadable payload, a failed dispatch, or a target that refused every
/// connection.
pub async fn run_attack(
    options: &AttackOptions,
    endpoints: &[WorkerEndpoint],
    shell: Arc<dyn RemoteShell>,
    settings: Arc<ExecutorSettings>,
) -> AppResult<AggregateReport> {
    let plan = build_jobs(endpoints, options)?;
    if let Some(path) = options.csv_path.as_deref() {
        ensure_csv_writable(path).await?;
    }
    let payload = match options.post_file.as_deref() {
        Some(path) => Some(read_payload(path).await?),
        None => None,
    };

    if let Some(first) = plan.jobs.first() {
        info!(
            "Each of {} bees will fire {} rounds, {} at a time.",
            plan.jobs.len(),
            first.requests,
            first.concurrency
        );
    }
    let failed_stings = prime_targets(&plan.jobs, options.priming, payload.as_deref()).await?;
    if failed_stings > 0 {
        info!("{} target(s) could not be stung; continuing", failed_stings);
    }

    info!("Organizing the swarm.");
    let results = dispatch(plan.jobs.clone(), shell, settings).await?;

    let mut rng = StdRng::from_entropy();
    let report = aggregate(results, &plan.jobs, options.thresholds, &mut rng)?;
    info!("Offensive complete.");

    if let Some(path) = options.csv_path.as_deref() {
        write_csv(path, &report).await?;
    }
    Ok(report)
}

async fn ensure_csv_writable(path: &Path) -> Result<(), AttackError> {
    tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await
        .map(drop)
        .map_err(|err| AttackError::CsvNotWritable {
            path: path.to_path_buf(),
            source: err,
        })
}

async fn read_payload(path: &Path) -> Result<Vec<u8>, AttackError> {
    tokio::fs::read(path)
        .await
        .map_err(|err| AttackError::PayloadUnreadable {
            path: path.to_path_buf(),
            source: err,
        })
}
