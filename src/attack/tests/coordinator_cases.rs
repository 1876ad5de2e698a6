use super::*;

fn addresses(jobs: &[AttackJobSpec]) -> Vec<String> {
    jobs.iter().map(|job| job.endpoint.address.clone()).collect()
}

fn no_install() -> Arc<ExecutorSettings> {
    Arc::new(ExecutorSettings {
        install_command: None,
    })
}

#[tokio::test(flavor = "current_thread")]
async fn results_come_back_in_job_order() -> AppResult<()> {
    let jobs = jobs(3)?;
    let addresses = addresses(&jobs);
    let shell = FakeShell::answering(addresses.get(..2).unwrap_or_default())
        .with(addresses.get(1).map_or("", String::as_str), FakeBee::Stalls);
    let results = dispatch(jobs, Arc::new(shell), no_install()).await?;

    let kinds: Vec<&str> = results
        .iter()
        .map(|result| match result {
            WorkerResult::Success { .. } => "success",
            WorkerResult::Timeout { .. } => "timeout",
            WorkerResult::TransportFailure { .. } => "transport",
        })
        .collect();
    if kinds != ["success", "timeout", "transport"] {
        return Err(AppError::validation(format!("Unexpected results: {:?}", kinds)));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn missing_temp_file_is_a_timeout() -> AppResult<()> {
    let mut jobs = jobs(1)?;
    let address = jobs
        .first()
        .map(|job| job.endpoint.address.clone())
        .unwrap_or_default();
    for job in &mut jobs {
        job.post_file = Some(std::path::PathBuf::from("/srv/payload/body.json"));
    }
    let shell = Arc::new(FakeShell::default().with(&address, FakeBee::NoTempFile));
    let results = dispatch(jobs, Arc::clone(&shell) as Arc<dyn RemoteShell>, no_install()).await?;
    if !matches!(
        results.as_slice(),
        [WorkerResult::Timeout {
            reason: TimeoutReason::NoTempFile,
        }]
    ) {
        return Err(AppError::validation(format!("Unexpected results: {:?}", results)));
    }
    // A bee that cannot hand out a temp file never gets the payload.
    let commands: Vec<String> = shell.recorded().into_iter().map(|(_, command)| command).collect();
    if commands != ["mktemp"] {
        return Err(AppError::validation(format!("Unexpected commands: {:?}", commands)));
    }
    Ok(())
}

async fn single_bee_result(bee: FakeBee) -> AppResult<WorkerResult> {
    let jobs = jobs(1)?;
    let address = jobs
        .first()
        .map(|job| job.endpoint.address.clone())
        .unwrap_or_default();
    let shell = FakeShell::default().with(&address, bee);
    let mut results = dispatch(jobs, Arc::new(shell), no_install()).await?;
    results
        .pop()
        .ok_or_else(|| AppError::validation("One result expected"))
}

#[tokio::test(flavor = "current_thread")]
async fn empty_timing_csv_is_a_timeout() -> AppResult<()> {
    match single_bee_result(FakeBee::EmptyCsv).await? {
        WorkerResult::Timeout {
            reason: TimeoutReason::EmptyTimingCsv,
        } => Ok(()),
        other => Err(AppError::validation(format!("Unexpected result: {:?}", other))),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn summary_without_mean_line_is_a_timeout() -> AppResult<()> {
    match single_bee_result(FakeBee::NoMeanLine).await? {
        WorkerResult::Timeout {
            reason: TimeoutReason::MissingMeanTimePerRequest,
        } => Ok(()),
        other => Err(AppError::validation(format!("Unexpected result: {:?}", other))),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn refusing_target_is_a_timeout_with_its_own_reason() -> AppResult<()> {
    match single_bee_result(FakeBee::TargetRefuses).await? {
        WorkerResult::Timeout {
            reason: TimeoutReason::TargetRefused,
        } => Ok(()),
        other => Err(AppError::validation(format!("Unexpected result: {:?}", other))),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn bounded_pool_still_runs_every_job() -> AppResult<()> {
    let jobs = jobs(4)?;
    let shell = FakeShell::answering(&addresses(&jobs));
    let results = dispatch_with_pool_size(jobs, Arc::new(shell), no_install(), 1).await?;
    if results.len() != 4 || !results.iter().all(WorkerResult::is_success) {
        return Err(AppError::validation(format!(
            "Expected four successes, got {:?}",
            results
        )));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn remote_steps_run_in_order() -> AppResult<()> {
    let mut jobs = jobs(1)?;
    for job in &mut jobs {
        job.post_file = Some(std::path::PathBuf::from("/srv/payload/body.json"));
    }
    let shell = Arc::new(FakeShell::answering(&addresses(&jobs)));
    let settings = Arc::new(ExecutorSettings::default());
    let results = dispatch(jobs, Arc::clone(&shell) as Arc<dyn RemoteShell>, settings).await?;
    if !results.iter().all(WorkerResult::is_success) {
        return Err(AppError::validation("Scripted bee should succeed"));
    }

    let commands: Vec<String> = shell
        .recorded()
        .into_iter()
        .map(|(_, command)| command)
        .collect();
    let steps: Vec<&str> = commands
        .iter()
        .map(|command| command.split_whitespace().next().unwrap_or_default())
        .collect();
    if steps != ["mktemp", "upload", "sudo", "ulimit", "cat"] {
        return Err(AppError::validation(format!("Unexpected steps: {:?}", steps)));
    }
    if commands.get(2).map(String::as_str) != Some(DEFAULT_INSTALL_COMMAND) {
        return Err(AppError::validation("Install command should run after staging"));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn empty_job_list_is_rejected() -> AppResult<()> {
    let shell: Arc<dyn RemoteShell> = Arc::new(FakeShell::default());
    match dispatch(Vec::new(), shell, no_install()).await {
        Err(crate::error::AttackError::Dispatch(_)) => Ok(()),
        other => Err(AppError::validation(format!(
            "Expected dispatch failure, got {:?}",
            other.map(|results| results.len())
        ))),
    }
}
