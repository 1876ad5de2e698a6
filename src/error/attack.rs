use std::path::PathBuf;

use thiserror::Error;

/// Problems with the requested load that are caught before any bee is contacted.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("The total number of requests must be at least {required} (2x num. instances).")]
    TooFewRequests { required: u64 },
    #[error("The number of concurrent requests must be at least {required} (num. instances).")]
    TooFewConcurrent { required: u64 },
    #[error(
        "The number of concurrent requests ({concurrency}) must be at most the same as number of requests ({requests})."
    )]
    ConcurrencyExceedsRequests { concurrency: u64, requests: u64 },
    #[error("No target URL was given.")]
    NoUrls,
    #[error("Invalid target URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// The swarm as a whole could not be put to work.
#[derive(Debug, Error)]
pub enum DispatchFailure {
    #[error("No bees are ready to attack.")]
    NoWorkers,
    #[error("Unable to collect bee {index}, are all instances accessible? {source}")]
    WorkerTaskFailed {
        index: usize,
        #[source]
        source: tokio::task::JoinError,
    },
    #[error("The worker pool was closed before every bee was dispatched.")]
    PoolClosed,
}

#[derive(Debug, Error)]
pub enum AttackError {
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),
    #[error("{0}")]
    Dispatch(#[from] DispatchFailure),
    #[error("Error getting results from bee {bee}: {line}")]
    SystemicUnreachable { bee: String, line: String },
    #[error("Your targets performance tests did not meet our standard.")]
    PerformanceRejected,
    #[error(
        "Specified csv file '{path}' is not writable. Check permissions or specify a different filename and try again: {source}"
    )]
    CsvNotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write csv file '{path}': {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("The post file '{path}' could not be read: {source}")]
    PayloadUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
