use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One attack participant, as handed over by the roster or the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerEndpoint {
    pub id: String,
    pub address: String,
    /// Name of the key used to authenticate against this bee (`~/.ssh/<name>.pem`).
    #[serde(default)]
    pub credential_ref: String,
}

impl WorkerEndpoint {
    #[must_use]
    pub fn new(id: &str, address: &str, credential_ref: &str) -> Self {
        Self {
            id: id.to_owned(),
            address: address.to_owned(),
            credential_ref: credential_ref.to_owned(),
        }
    }
}

/// How the target is warmed up before the swarm is released.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PrimingMode {
    None,
    #[default]
    Sequential,
    Parallel,
}

/// Acceptance criteria; a missing threshold never constrains the verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Thresholds {
    /// Maximum acceptable mean time per request, in milliseconds.
    pub max_mean_ms: Option<f64>,
    /// Minimum acceptable aggregate requests per second.
    pub min_rps: Option<f64>,
}

impl Thresholds {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.max_mean_ms.is_none() && self.min_rps.is_none()
    }
}

/// Every option the attack understands. Empty values contribute nothing to
/// the benchmark invocation.
#[derive(Debug, Clone, Default)]
pub struct AttackOptions {
    pub urls: Vec<String>,
    pub total_requests: u64,
    pub concurrency: u64,
    pub headers: Vec<(String, String)>,
    pub content_type: Option<String>,
    pub cookies: Option<String>,
    pub ciphers: Option<String>,
    /// `username:password`, passed verbatim to the benchmark tool.
    pub basic_auth: Option<String>,
    pub keep_alive: bool,
    pub post_file: Option<PathBuf>,
    pub priming: PrimingMode,
    pub thresholds: Thresholds,
    pub csv_path: Option<PathBuf>,
}

impl AttackOptions {
    /// Splits a comma separated URL list, dropping blank entries.
    #[must_use]
    pub fn split_urls(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

/// Fully resolved parameters for one bee's share of the attack.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackJobSpec {
    pub index: usize,
    pub endpoint: WorkerEndpoint,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub content_type: Option<String>,
    pub cookies: Option<String>,
    pub ciphers: Option<String>,
    pub basic_auth: Option<String>,
    pub requests: u64,
    pub concurrency: u64,
    pub post_file: Option<PathBuf>,
    pub keep_alive: bool,
}
