//! Line classifier for the benchmark tool's summary output.
//!
//! The remote side keeps only lines containing one of
//! [`OUTPUT_FILTER_PREFIXES`], which bounds the output regardless of how many
//! requests a bee fires. The same table drives the local classifier, so the
//! two cannot drift apart. Wording is pinned to ApacheBench 2.3.

use tracing::debug;

use super::result::{BenchmarkMetrics, FailedRequests, StatusHistogram};

const MEAN_TIME_PREFIX: &str = "Time per request:";
const MEAN_TIME_SUFFIX: &str = "[ms] (mean)";
const RPS_PREFIX: &str = "Requests per second:";
const FAILED_PREFIX: &str = "Failed requests:";
const COMPLETE_PREFIX: &str = "Complete requests:";
const FAILURE_DETAIL_PREFIX: &str = "(Connect:";
const RESPONSE_PREFIX: &str = "HTTP/1.1 ";
const TOOL_ERROR_PREFIX: &str = "apr_";

/// Column of the benchmark tool's percentile CSV holding the timing.
pub(crate) const TIMING_COLUMN: &str = "Time in ms";

/// Fixed strings kept by the remote filter. The failure detail line is
/// indented and parenthesised, so it is matched on `Connect:`.
pub(crate) const OUTPUT_FILTER_PREFIXES: [&str; 10] = [
    MEAN_TIME_PREFIX,
    RPS_PREFIX,
    FAILED_PREFIX,
    "Connect:",
    "Receive:",
    "Length:",
    "Exceptions:",
    COMPLETE_PREFIX,
    "HTTP/1.1",
    TOOL_ERROR_PREFIX,
];

/// Substring marking a tool error that means the target refused connections.
pub(crate) const CANNOT_CONNECT_SIGNATURE: &str = "apr_socket_connect";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum MetricLine {
    MeanTimePerRequest(f64),
    RequestsPerSecond(f64),
    FailedRequests(u64),
    FailureBreakdown {
        connect: u64,
        receive: u64,
        length: u64,
        exceptions: u64,
    },
    CompleteRequests(u64),
    Response(u16),
    ToolError(String),
    Other,
}

pub(crate) fn classify_line(raw: &str) -> MetricLine {
    let line = raw.trim();

    if let Some(rest) = line.strip_prefix(MEAN_TIME_PREFIX) {
        // The "(mean, across all concurrent requests)" variant is skipped.
        let rest = rest.trim();
        if let Some(value) = rest.strip_suffix(MEAN_TIME_SUFFIX) {
            return value
                .trim()
                .parse::<f64>()
                .map_or(MetricLine::Other, MetricLine::MeanTimePerRequest);
        }
        return MetricLine::Other;
    }
    if let Some(rest) = line.strip_prefix(RPS_PREFIX) {
        return first_token(rest)
            .and_then(|value| value.parse::<f64>().ok())
            .map_or(MetricLine::Other, MetricLine::RequestsPerSecond);
    }
    if let Some(rest) = line.strip_prefix(FAILED_PREFIX) {
        return first_token(rest)
            .and_then(parse_count)
            .map_or(MetricLine::Other, MetricLine::FailedRequests);
    }
    if let Some(rest) = line.strip_prefix(COMPLETE_PREFIX) {
        return first_token(rest)
            .and_then(|value| value.parse::<u64>().ok())
            .map_or(MetricLine::Other, MetricLine::CompleteRequests);
    }
    if line.starts_with(FAILURE_DETAIL_PREFIX) {
        return parse_failure_breakdown(line).unwrap_or(MetricLine::Other);
    }
    if let Some(rest) = line.strip_prefix(RESPONSE_PREFIX) {
        return first_token(rest)
            .filter(|code| code.len() == 3)
            .and_then(|code| code.parse::<u16>().ok())
            .map_or(MetricLine::Other, MetricLine::Response);
    }
    if line.starts_with(TOOL_ERROR_PREFIX) {
        return MetricLine::ToolError(line.to_owned());
    }
    MetricLine::Other
}

/// Parses filtered benchmark output.
///
/// Returns `None` when the mean time-per-request line is missing, which is
/// the signal that the bee produced no usable result.
pub(crate) fn parse_benchmark_output(text: &str) -> Option<BenchmarkMetrics> {
    let mut mean_time: Option<f64> = None;
    let mut requests_per_second: Option<f64> = None;
    let mut failed_total: Option<u64> = None;
    let mut breakdown = FailedRequests::default();
    let mut complete_requests: Option<u64> = None;
    let mut status_codes = StatusHistogram::default();
    let mut error_lines = Vec::new();

    for line in text.lines() {
        match classify_line(line) {
            MetricLine::MeanTimePerRequest(value) => keep_first(&mut mean_time, value),
            MetricLine::RequestsPerSecond(value) => keep_first(&mut requests_per_second, value),
            MetricLine::FailedRequests(value) => keep_first(&mut failed_total, value),
            MetricLine::FailureBreakdown {
                connect,
                receive,
                length,
                exceptions,
            } => {
                breakdown.connect = connect;
                breakdown.receive = receive;
                breakdown.length = length;
                breakdown.exceptions = exceptions;
            }
            MetricLine::CompleteRequests(value) => keep_first(&mut complete_requests, value),
            MetricLine::Response(code) => status_codes.record(code),
            MetricLine::ToolError(error_line) => error_lines.push(error_line),
            MetricLine::Other => {}
        }
    }

    let ms_per_request = mean_time?;
    if requests_per_second.is_none() || complete_requests.is_none() {
        debug!("Benchmark output lacks requests/sec or complete requests; defaulting to 0");
    }

    let total = failed_total.unwrap_or(0);
    // The breakdown is only meaningful when failures were reported.
    let failed_requests = if total > 0 {
        FailedRequests { total, ..breakdown }
    } else {
        FailedRequests::default()
    };

    Some(BenchmarkMetrics {
        requests_per_second: requests_per_second.unwrap_or(0.0),
        ms_per_request,
        complete_requests: complete_requests.unwrap_or(0),
        failed_requests,
        status_codes,
        error_lines,
    })
}

/// Parses the benchmark tool's timing CSV into the ordered timing column.
///
/// Rows that do not parse are skipped; a missing header yields nothing.
pub(crate) fn parse_timing_csv(text: &str) -> Vec<f64> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let Some(column) = header
        .split(',')
        .position(|name| name.trim().trim_matches('"') == TIMING_COLUMN)
    else {
        debug!("Timing CSV header lacks '{}': {}", TIMING_COLUMN, header);
        return Vec::new();
    };

    lines
        .filter_map(|line| line.split(',').nth(column))
        .filter_map(|value| value.trim().trim_matches('"').parse::<f64>().ok())
        .collect()
}

fn keep_first<T>(slot: &mut Option<T>, value: T) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

fn first_token(rest: &str) -> Option<&str> {
    rest.split_whitespace().next()
}

/// Counts are integers, but tolerate a trailing fraction such as `3.0`.
fn parse_count(value: &str) -> Option<u64> {
    let value = value.trim_end_matches(',');
    if let Ok(count) = value.parse::<u64>() {
        return Some(count);
    }
    let (whole, fraction) = value.split_once('.')?;
    if fraction.chars().all(|ch| ch == '0') {
        whole.parse::<u64>().ok()
    } else {
        None
    }
}

fn parse_failure_breakdown(line: &str) -> Option<MetricLine> {
    let inner = line.trim_start_matches('(').trim_end_matches(')');
    let mut connect = None;
    let mut receive = None;
    let mut length = None;
    let mut exceptions = None;
    for part in inner.split(',') {
        let (label, value) = part.split_once(':')?;
        let count = parse_count(value.trim())?;
        match label.trim() {
            "Connect" => connect = Some(count),
            "Receive" => receive = Some(count),
            "Length" => length = Some(count),
            "Exceptions" => exceptions = Some(count),
            _ => return None,
        }
    }
    Some(MetricLine::FailureBreakdown {
        connect: connect?,
        receive: receive?,
        length: length?,
        exceptions: exceptions?,
    })
}
