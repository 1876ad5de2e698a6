use std::fmt;

/// Failed-request counters reported by the benchmark tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailedRequests {
    pub total: u64,
    pub connect: u64,
    pub receive: u64,
    pub length: u64,
    pub exceptions: u64,
}

impl FailedRequests {
    #[must_use]
    pub const fn merged(self, other: Self) -> Self {
        Self {
            total: self.total.saturating_add(other.total),
            connect: self.connect.saturating_add(other.connect),
            receive: self.receive.saturating_add(other.receive),
            length: self.length.saturating_add(other.length),
            exceptions: self.exceptions.saturating_add(other.exceptions),
        }
    }
}

/// Response lines counted per status class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusHistogram {
    pub status_2xx: u64,
    pub status_3xx: u64,
    pub status_4xx: u64,
    pub status_5xx: u64,
}

impl StatusHistogram {
    pub(crate) fn record(&mut self, code: u16) {
        match code {
            200..=299 => self.status_2xx = self.status_2xx.saturating_add(1),
            300..=399 => self.status_3xx = self.status_3xx.saturating_add(1),
            400..=499 => self.status_4xx = self.status_4xx.saturating_add(1),
            500..=599 => self.status_5xx = self.status_5xx.saturating_add(1),
            _ => {}
        }
    }

    #[must_use]
    pub const fn merged(self, other: Self) -> Self {
        Self {
            status_2xx: self.status_2xx.saturating_add(other.status_2xx),
            status_3xx: self.status_3xx.saturating_add(other.status_3xx),
            status_4xx: self.status_4xx.saturating_add(other.status_4xx),
            status_5xx: self.status_5xx.saturating_add(other.status_5xx),
        }
    }
}

/// Numbers extracted from one bee's filtered benchmark output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkMetrics {
    pub requests_per_second: f64,
    pub ms_per_request: f64,
    pub complete_requests: u64,
    pub failed_requests: FailedRequests,
    pub status_codes: StatusHistogram,
    /// Error lines the benchmark tool printed while still producing a summary.
    pub error_lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutReason {
    /// The bee never handed out a temp file for the timing CSV.
    NoTempFile,
    /// The summary lacked a mean time-per-request line.
    MissingMeanTimePerRequest,
    /// Like `MissingMeanTimePerRequest`, but the tool gave up because the
    /// target refused its connections.
    TargetRefused,
    /// The timing CSV came back empty.
    EmptyTimingCsv,
    /// A remote command outlived its deadline.
    CommandStalled,
}

impl fmt::Display for TimeoutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TimeoutReason::NoTempFile => "connection timed out creating csv_filename",
            TimeoutReason::MissingMeanTimePerRequest => "ab command failed",
            TimeoutReason::TargetRefused => "ab could not connect to the target",
            TimeoutReason::EmptyTimingCsv => "connection timed out reading csv",
            TimeoutReason::CommandStalled => "remote command stalled",
        };
        f.write_str(text)
    }
}

/// Outcome of one bee's share of the attack. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerResult {
    Success {
        metrics: BenchmarkMetrics,
        /// Per-request timings from the bee's CSV, in milliseconds.
        raw_sample_times: Vec<f64>,
    },
    Timeout {
        reason: TimeoutReason,
    },
    TransportFailure {
        cause: String,
    },
}

impl WorkerResult {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, WorkerResult::Success { .. })
    }
}
