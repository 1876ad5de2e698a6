use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::options::{AttackJobSpec, PrimingMode};
use crate::error::{AppError, AppResult};

const DEFAULT_STING_TIMEOUT: Duration = Duration::from_secs(30);

/// Requests each target once so caches are warm before the attack.
///
/// Priming failures are logged and counted, never fatal.
///
/// # Errors
///
/// Returns an error only when the HTTP client cannot be built.
pub async fn prime_targets(
    jobs: &[AttackJobSpec],
    mode: PrimingMode,
    payload: Option<&[u8]>,
) -> AppResult<usize> {
    match mode {
        PrimingMode::None => {
            info!("Stinging URL skipped.");
            Ok(0)
        }
        PrimingMode::Sequential => {
            info!("Stinging URL sequentially so it will be cached for the attack.");
            let client = build_client()?;
            let mut failures = 0usize;
            for job in jobs {
                if let Err(err) = sting(&client, job, payload).await {
                    warn!(url = %job.url, "Stinging failed: {}", err);
                    failures = failures.saturating_add(1);
                }
            }
            Ok(failures)
        }
        PrimingMode::Parallel => {
            info!("Stinging URL in parallel so it will be cached for the attack.");
            let client = build_client()?;
            Ok(sting_parallel(&client, jobs, payload).await)
        }
    }
}

/// Each distinct URL is stung once. Distinct URLs never outnumber the bees, so
/// one task per URL is already `min(urls, bees)` requests in flight.
async fn sting_parallel(
    client: &reqwest::Client,
    jobs: &[AttackJobSpec],
    payload: Option<&[u8]>,
) -> usize {
    let payload: Option<Arc<[u8]>> = payload.map(Arc::from);
    let mut seen = HashSet::new();
    let targets: Vec<AttackJobSpec> = jobs
        .iter()
        .filter(|job| seen.insert(job.url.clone()))
        .cloned()
        .collect();

    let mut tasks = JoinSet::new();
    for job in targets {
        let client = client.clone();
        let payload = payload.clone();
        tasks.spawn(async move {
            match sting(&client, &job, payload.as_deref()).await {
                Ok(()) => true,
                Err(err) => {
                    warn!(url = %job.url, "Stinging failed: {}", err);
                    false
                }
            }
        });
    }

    let mut failures = 0usize;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(true) => {}
            Ok(false) => failures = failures.saturating_add(1),
            Err(err) => {
                warn!("Sting task failed: {}", err);
                failures = failures.saturating_add(1);
            }
        }
    }
    failures
}

fn build_client() -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .timeout(DEFAULT_STING_TIMEOUT)
        .build()
        .map_err(AppError::from)
}

async fn sting(
    client: &reqwest::Client,
    job: &AttackJobSpec,
    payload: Option<&[u8]>,
) -> Result<(), reqwest::Error> {
    let mut request = match payload {
        Some(body) => client.post(&job.url).body(body.to_vec()),
        None => client.get(&job.url),
    };
    if let Some(cookies) = job.cookies.as_deref() {
        request = request.header(COOKIE, cookies);
    }
    if let Some(auth) = job.basic_auth.as_deref() {
        request = request.header(AUTHORIZATION, basic_auth_header(auth));
    }
    if let Some(content_type) = job.content_type.as_deref() {
        request = request.header(CONTENT_TYPE, content_type);
    }
    for (name, value) in &job.headers {
        request = request.header(name.as_str(), value.as_str());
    }

    let response = request.send().await?;
    let status = response.status();
    let body = response.bytes().await?;
    debug!(url = %job.url, status = status.as_u16(), bytes = body.len(), "Target stung");
    Ok(())
}

/// `Authorization` value for a `user:password` pair.
pub(crate) fn basic_auth_header(credentials: &str) -> String {
    format!("Basic {}", STANDARD.encode(credentials))
}
