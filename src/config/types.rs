use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::attack::PrimingMode;
use crate::error::AppResult;

/// Keys accepted in `bees.toml` / `bees.json`. They mirror the `attack` flags.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// A single URL, a comma separated list, or an array of URLs.
    pub url: Option<UrlList>,
    #[serde(alias = "number")]
    pub requests: Option<u64>,
    #[serde(alias = "concurrency")]
    pub concurrent: Option<u64>,
    pub headers: Option<Vec<String>>,
    pub content_type: Option<String>,
    pub cookies: Option<String>,
    pub ciphers: Option<String>,
    pub basic_auth: Option<String>,
    pub keep_alive: Option<bool>,
    pub post_file: Option<PathBuf>,
    pub sting: Option<PrimingMode>,
    pub csv: Option<PathBuf>,
    pub tpr: Option<f64>,
    pub rps: Option<f64>,
    pub connect_timeout: Option<DurationValue>,
    pub command_timeout: Option<DurationValue>,
    pub bees: Option<Vec<String>>,
    pub username: Option<String>,
    pub key: Option<String>,
    pub key_dir: Option<PathBuf>,
    pub install_command: Option<String>,
    pub no_color: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UrlList {
    One(String),
    Many(Vec<String>),
}

impl UrlList {
    /// Joined the way `--url` accepts them.
    #[must_use]
    pub fn joined(&self) -> String {
        match self {
            UrlList::One(url) => url.clone(),
            UrlList::Many(urls) => urls.join(","),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self, field: &'static str) -> AppResult<Duration> {
        match self {
            DurationValue::Seconds(secs) => super::parse::seconds_to_duration(field, *secs),
            DurationValue::Text(text) => super::parse_duration_value(field, text),
        }
    }
}
