use tracing::warn;

use crate::error::{AttackError, ConfigurationError, DispatchFailure};

use super::options::{AttackJobSpec, AttackOptions, WorkerEndpoint};
use super::output::OUTPUT_FILTER_PREFIXES;

/// Soft file-descriptor limit raised before the benchmark tool starts.
const OPEN_FILE_LIMIT: u32 = 4096;
/// Verbosity that makes the benchmark tool print every response status line.
const BENCHMARK_VERBOSITY: u8 = 3;
/// Placeholder session cookie sent when no cookies are configured.
const PLACEHOLDER_SESSION: &str = "sessionid=NotARealSessionID";
/// Total requests must cover at least this many per bee.
const MIN_REQUESTS_PER_BEE: u64 = 2;

/// Conditions that do not stop the attack but deserve a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanWarning {
    /// More URLs than bees were given; the trailing ones are never attacked.
    UnusedUrls { unused: usize },
}

/// Job specs for every bee, index-aligned with the endpoint list.
#[derive(Debug, Clone)]
pub struct JobPlan {
    pub jobs: Vec<AttackJobSpec>,
    pub warnings: Vec<PlanWarning>,
}

/// Requests and concurrency handed to each bee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadShare {
    pub requests: u64,
    pub concurrency: u64,
}

/// Checks the requested load against the number of bees.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] when there are fewer than two requests per
/// bee, fewer concurrent requests than bees, or more concurrency than requests.
pub fn validate_load(
    total_requests: u64,
    concurrency: u64,
    workers: usize,
) -> Result<LoadShare, ConfigurationError> {
    let workers = u64::try_from(workers).unwrap_or(u64::MAX).max(1);
    let required_requests = workers.saturating_mul(MIN_REQUESTS_PER_BEE);
    if total_requests < required_requests {
        return Err(ConfigurationError::TooFewRequests {
            required: required_requests,
        });
    }
    if concurrency < workers {
        return Err(ConfigurationError::TooFewConcurrent { required: workers });
    }
    if total_requests < concurrency {
        return Err(ConfigurationError::ConcurrencyExceedsRequests {
            concurrency,
            requests: total_requests,
        });
    }

    Ok(LoadShare {
        requests: total_requests.checked_div(workers).unwrap_or(0),
        concurrency: concurrency.checked_div(workers).unwrap_or(0),
    })
}

/// Builds the job spec for bee `index`; URLs are assigned round-robin.
///
/// # Errors
///
/// Returns [`ConfigurationError::NoUrls`] when the URL list is empty.
pub fn build_job(
    index: usize,
    endpoint: &WorkerEndpoint,
    urls: &[String],
    options: &AttackOptions,
    share: LoadShare,
) -> Result<AttackJobSpec, ConfigurationError> {
    let slot = index.checked_rem(urls.len()).ok_or(ConfigurationError::NoUrls)?;
    let url = urls.get(slot).ok_or(ConfigurationError::NoUrls)?;

    Ok(AttackJobSpec {
        index,
        endpoint: endpoint.clone(),
        url: url.clone(),
        headers: options.headers.clone(),
        content_type: non_empty(options.content_type.as_deref()),
        cookies: non_empty(options.cookies.as_deref()),
        ciphers: non_empty(options.ciphers.as_deref()),
        basic_auth: non_empty(options.basic_auth.as_deref()),
        requests: share.requests,
        concurrency: share.concurrency,
        post_file: options.post_file.clone(),
        keep_alive: options.keep_alive,
    })
}

/// Builds one job per bee after validating the requested load.
///
/// # Errors
///
/// Returns an error when no bees are available, the URL list is empty or
/// malformed, or the load does not fit the number of bees.
pub fn build_jobs(
    endpoints: &[WorkerEndpoint],
    options: &AttackOptions,
) -> Result<JobPlan, AttackError> {
    if endpoints.is_empty() {
        return Err(DispatchFailure::NoWorkers.into());
    }
    if options.urls.is_empty() {
        return Err(ConfigurationError::NoUrls.into());
    }
    for url in &options.urls {
        url::Url::parse(url).map_err(|err| ConfigurationError::InvalidUrl {
            url: url.clone(),
            source: err,
        })?;
    }

    let share = validate_load(options.total_requests, options.concurrency, endpoints.len())?;

    let mut warnings = Vec::new();
    if options.urls.len() > endpoints.len() {
        let unused = options.urls.len().saturating_sub(endpoints.len());
        warn!(
            "More urls given than instances; the last {} url(s) will be ignored.",
            unused
        );
        warnings.push(PlanWarning::UnusedUrls { unused });
    }

    let jobs = endpoints
        .iter()
        .enumerate()
        .map(|(index, endpoint)| build_job(index, endpoint, &options.urls, options, share))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(JobPlan { jobs, warnings })
}

impl AttackJobSpec {
    /// Flags for the benchmark tool, in the order they are emitted.
    #[must_use]
    pub fn benchmark_options(&self, csv_path: &str, remote_payload: Option<&str>) -> Vec<String> {
        let mut options = Vec::new();
        for (name, value) in &self.headers {
            options.push("-H".to_owned());
            options.push(shell_quote(&format!("{}: {}", name, value)));
        }
        if let Some(content_type) = self.content_type.as_deref() {
            options.push("-T".to_owned());
            options.push(shell_quote(content_type));
        }
        options.push("-e".to_owned());
        options.push(shell_quote(csv_path));
        if let Some(payload) = remote_payload {
            options.push("-p".to_owned());
            options.push(payload.to_owned());
        }
        if self.keep_alive {
            options.push("-k".to_owned());
        }
        match self.cookies.as_deref() {
            Some(cookies) => {
                options.push("-H".to_owned());
                options.push(shell_quote(&format!(
                    "Cookie: {};{};",
                    cookies, PLACEHOLDER_SESSION
                )));
            }
            None => {
                options.push("-C".to_owned());
                options.push(shell_quote(PLACEHOLDER_SESSION));
            }
        }
        if let Some(ciphers) = self.ciphers.as_deref() {
            options.push("-Z".to_owned());
            options.push(shell_quote(ciphers));
        }
        if let Some(auth) = self.basic_auth.as_deref() {
            options.push("-A".to_owned());
            options.push(shell_quote(auth));
        }
        options
    }

    /// The full remote invocation, with output filtered down to the metric lines.
    #[must_use]
    pub fn benchmark_command(&self, csv_path: &str, remote_payload: Option<&str>) -> String {
        format!(
            "ulimit -S -n {} && ab -v {} -r -n {} -c {} {} {} 2>&1 | grep -F {}",
            OPEN_FILE_LIMIT,
            BENCHMARK_VERBOSITY,
            self.requests,
            self.concurrency,
            self.benchmark_options(csv_path, remote_payload).join(" "),
            shell_quote(&self.url),
            shell_quote(&OUTPUT_FILTER_PREFIXES.join("\n")),
        )
    }
}

/// Single-quotes `value` for a POSIX shell.
#[must_use]
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}
