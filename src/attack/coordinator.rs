use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::executor::{ExecutorSettings, execute_job};
use super::options::AttackJobSpec;
use super::result::WorkerResult;
use crate::error::{AttackError, DispatchFailure};
use crate::remote::RemoteShell;

type WorkerHandle = JoinHandle<Result<WorkerResult, DispatchFailure>>;

/// Runs every job concurrently, one task per bee, and returns the results
/// in job order.
///
/// # Errors
///
/// Returns [`DispatchFailure`] when there are no jobs or a worker task
/// panics or is cancelled. Per-bee failures are recorded in the results.
pub async fn dispatch(
    jobs: Vec<AttackJobSpec>,
    shell: Arc<dyn RemoteShell>,
    settings: Arc<ExecutorSettings>,
) -> Result<Vec<WorkerResult>, AttackError> {
    let pool_size = jobs.len();
    dispatch_with_pool_size(jobs, shell, settings, pool_size).await
}

/// Like [`dispatch`], with at most `pool_size` bees attacking at once.
///
/// # Errors
///
/// See [`dispatch`].
pub async fn dispatch_with_pool_size(
    jobs: Vec<AttackJobSpec>,
    shell: Arc<dyn RemoteShell>,
    settings: Arc<ExecutorSettings>,
    pool_size: usize,
) -> Result<Vec<WorkerResult>, AttackError> {
    if jobs.is_empty() {
        return Err(DispatchFailure::NoWorkers.into());
    }

    let permits = Arc::new(Semaphore::new(pool_size.max(1)));
    let handles: Vec<WorkerHandle> = jobs
        .into_iter()
        .map(|job| {
            let shell = Arc::clone(&shell);
            let settings = Arc::clone(&settings);
            let permits = Arc::clone(&permits);
            tokio::spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|_closed| DispatchFailure::PoolClosed)?;
                let result = match execute_job(shell.as_ref(), &job, &settings).await {
                    Ok(result) => result,
                    Err(err) => {
                        error!(bee = %job.endpoint.id, "Bee {} failed: {}", job.index, err);
                        WorkerResult::TransportFailure {
                            cause: err.to_string(),
                        }
                    }
                };
                Ok(result)
            })
        })
        .collect();

    collect_in_order(handles).await
}

async fn collect_in_order(handles: Vec<WorkerHandle>) -> Result<Vec<WorkerResult>, AttackError> {
    let mut results = Vec::with_capacity(handles.len());
    let mut pending = handles.into_iter().enumerate();

    let mut failure = None;
    for (index, handle) in pending.by_ref() {
        match handle.await {
            Ok(Ok(result)) => results.push(result),
            Ok(Err(pool_failure)) => {
                failure = Some(pool_failure);
                break;
            }
            Err(source) => {
                failure = Some(DispatchFailure::WorkerTaskFailed { index, source });
                break;
            }
        }
    }
    if let Some(failure) = failure {
        for (_, rest) in pending {
            rest.abort();
        }
        return Err(failure.into());
    }

    debug!("Collected {} worker results", results.len());
    Ok(results)
}
