//! Folds per-bee results into one report.
//!
//! The global latency distribution is rebuilt by resampling each bee's raw
//! timings in proportion to the requests it completed, so no single place
//! ever holds every sample.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use super::options::{AttackJobSpec, Thresholds};
use super::output::CANNOT_CONNECT_SIGNATURE;
use super::result::{
    BenchmarkMetrics, FailedRequests, StatusHistogram, TimeoutReason, WorkerResult,
};
use crate::error::AttackError;

/// Number of points in the reconstructed distribution.
pub const CDF_POINTS: usize = 100;
/// Size of the resampling pool the distribution is read from.
const SAMPLE_SIZE: usize = CDF_POINTS.saturating_mul(CDF_POINTS);
/// Pool stride between two consecutive output points.
const SAMPLE_STRIDE: usize = SAMPLE_SIZE.saturating_div(CDF_POINTS);

/// Mean time per request across completed bees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeanResponse {
    /// No bee completed, so there is no number to report.
    Incomplete,
    Millis(f64),
}

impl MeanResponse {
    #[must_use]
    pub const fn millis(self) -> Option<f64> {
        match self {
            MeanResponse::Incomplete => None,
            MeanResponse::Millis(value) => Some(value),
        }
    }
}

impl fmt::Display for MeanResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeanResponse::Incomplete => f.write_str("no bees are complete"),
            MeanResponse::Millis(value) => write!(f, "{:.6}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletedBee {
    pub job: AttackJobSpec,
    pub metrics: BenchmarkMetrics,
    pub raw_sample_times: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimedOutBee {
    pub job: AttackJobSpec,
    pub reason: TimeoutReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedBee {
    pub job: AttackJobSpec,
    pub cause: String,
}

/// Everything the renderer needs; built once per attack.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateReport {
    pub num_complete: usize,
    pub num_timeout: usize,
    pub num_exception: usize,
    pub complete: Vec<CompletedBee>,
    pub timed_out: Vec<TimedOutBee>,
    pub exceptions: Vec<FailedBee>,
    pub complete_requests: u64,
    pub failed_requests: FailedRequests,
    pub status_codes: StatusHistogram,
    /// Sum of every completed bee's requests per second.
    pub mean_requests: f64,
    pub mean_response: MeanResponse,
    /// Ascending latencies; empty when no bee completed.
    pub request_time_cdf: Vec<f64>,
    pub thresholds: Thresholds,
    pub performance_accepted: Option<bool>,
}

impl AggregateReport {
    #[must_use]
    pub const fn num_bees(&self) -> usize {
        self.num_complete
            .saturating_add(self.num_timeout)
            .saturating_add(self.num_exception)
    }

    /// Latency at `percent` (1..=100) of the reconstructed distribution.
    #[must_use]
    pub fn percentile(&self, percent: usize) -> Option<f64> {
        self.request_time_cdf
            .get(percent.checked_sub(1)?)
            .copied()
    }
}

/// Builds the report from index-aligned results and job specs.
///
/// # Errors
///
/// Returns [`AttackError::SystemicUnreachable`] when a completed bee reported
/// that it could not connect to the target at all.
pub fn aggregate<R>(
    results: Vec<WorkerResult>,
    jobs: &[AttackJobSpec],
    thresholds: Thresholds,
    rng: &mut R,
) -> Result<AggregateReport, AttackError>
where
    R: Rng + ?Sized,
{
    let mut complete = Vec::new();
    let mut timed_out = Vec::new();
    let mut exceptions = Vec::new();

    for (result, job) in results.into_iter().zip(jobs) {
        match result {
            WorkerResult::Success {
                metrics,
                raw_sample_times,
            } => {
                if let Some(line) = metrics
                    .error_lines
                    .iter()
                    .find(|line| line.contains(CANNOT_CONNECT_SIGNATURE))
                {
                    return Err(AttackError::SystemicUnreachable {
                        bee: job.endpoint.id.clone(),
                        line: line.clone(),
                    });
                }
                complete.push(CompletedBee {
                    job: job.clone(),
                    metrics,
                    raw_sample_times,
                });
            }
            WorkerResult::Timeout { reason } => timed_out.push(TimedOutBee {
                job: job.clone(),
                reason,
            }),
            WorkerResult::TransportFailure { cause } => exceptions.push(FailedBee {
                job: job.clone(),
                cause,
            }),
        }
    }

    if target_refused_everywhere(&complete, &timed_out) {
        warn!(
            "Every bee gave up because the target refused connections. Check that the target is up and reachable from the bees."
        );
    }

    let mut complete_requests = 0u64;
    let mut failed_requests = FailedRequests::default();
    let mut status_codes = StatusHistogram::default();
    let mut mean_requests = 0.0;
    let mut response_sum = 0.0;
    for bee in &complete {
        complete_requests = complete_requests.saturating_add(bee.metrics.complete_requests);
        failed_requests = failed_requests.merged(bee.metrics.failed_requests);
        status_codes = status_codes.merged(bee.metrics.status_codes);
        mean_requests += bee.metrics.requests_per_second;
        response_sum += bee.metrics.ms_per_request;
    }

    let mean_response = if complete.is_empty() {
        MeanResponse::Incomplete
    } else {
        MeanResponse::Millis(response_sum / complete.len() as f64)
    };
    let request_time_cdf = reconstruct_cdf(&complete, rng);
    let performance_accepted = evaluate_thresholds(mean_response, mean_requests, thresholds);

    Ok(AggregateReport {
        num_complete: complete.len(),
        num_timeout: timed_out.len(),
        num_exception: exceptions.len(),
        complete,
        timed_out,
        exceptions,
        complete_requests,
        failed_requests,
        status_codes,
        mean_requests,
        mean_response,
        request_time_cdf,
        thresholds,
        performance_accepted,
    })
}

/// True when no bee completed and every timed out bee saw the target refuse
/// its connections.
pub(crate) fn target_refused_everywhere(
    complete: &[CompletedBee],
    timed_out: &[TimedOutBee],
) -> bool {
    complete.is_empty()
        && !timed_out.is_empty()
        && timed_out
            .iter()
            .all(|bee| bee.reason == TimeoutReason::TargetRefused)
}

/// Number of pool samples each bee contributes, proportional to the
/// requests it completed. Equal shares when nobody reported a count.
pub(crate) fn sample_shares(completed_requests: &[u64]) -> Vec<usize> {
    let total: u128 = completed_requests.iter().map(|count| u128::from(*count)).sum();
    if total == 0 {
        let equal = SAMPLE_SIZE
            .checked_div(completed_requests.len())
            .unwrap_or(0);
        return vec![equal; completed_requests.len()];
    }

    let pool = u128::try_from(SAMPLE_SIZE).unwrap_or(u128::MAX);
    completed_requests
        .iter()
        .map(|count| {
            let share = u128::from(*count)
                .saturating_mul(pool)
                .checked_div(total)
                .unwrap_or(0);
            usize::try_from(share).unwrap_or(SAMPLE_SIZE)
        })
        .collect()
}

/// Rebuilds a [`CDF_POINTS`]-point latency distribution from every
/// completed bee's raw timings.
pub(crate) fn reconstruct_cdf<R>(complete: &[CompletedBee], rng: &mut R) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    let counts: Vec<u64> = complete
        .iter()
        .map(|bee| bee.metrics.complete_requests)
        .collect();
    let mut pool = draw_pool(complete, &sample_shares(&counts), rng);
    if pool.is_empty() {
        // Shares can all floor to zero; fall back to equal weighting.
        let equal = vec![0; complete.len()];
        pool = draw_pool(complete, &sample_shares(&equal), rng);
    }
    if pool.is_empty() {
        return Vec::new();
    }

    pool.sort_by(f64::total_cmp);
    let last = pool.len().saturating_sub(1);
    let cdf: Vec<f64> = (0..CDF_POINTS)
        .filter_map(|point| pool.get(point.saturating_mul(SAMPLE_STRIDE).min(last)).copied())
        .collect();
    debug!("Reconstructed latency distribution from {} samples", pool.len());
    cdf
}

fn draw_pool<R>(complete: &[CompletedBee], shares: &[usize], rng: &mut R) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    let mut pool = Vec::with_capacity(SAMPLE_SIZE);
    for (bee, share) in complete.iter().zip(shares) {
        for _ in 0..*share {
            match bee.raw_sample_times.choose(rng) {
                Some(sample) => pool.push(*sample),
                None => break,
            }
        }
    }
    pool
}

/// Verdict against the acceptance criteria. `None` when no criterion was
/// given or no bee completed.
#[must_use]
pub fn evaluate_thresholds(
    mean_response: MeanResponse,
    mean_requests: f64,
    thresholds: Thresholds,
) -> Option<bool> {
    let mean_ms = mean_response.millis()?;
    let mut accepted = thresholds.max_mean_ms.map(|max| mean_ms < max);
    if let Some(min_rps) = thresholds.min_rps {
        let rps_ok = mean_requests > min_rps;
        accepted = Some(accepted.map_or(rps_ok, |prior| prior && rps_ok));
    }
    accepted
}
