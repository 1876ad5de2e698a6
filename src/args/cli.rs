use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::attack::{PrimingMode, WorkerEndpoint};

use super::defaults::{
    DEFAULT_CONCURRENT, DEFAULT_REQUESTS, DEFAULT_USERNAME, DEFAULT_ZONE, default_roster_path,
};
use super::parsers::{
    parse_basic_auth, parse_bee, parse_duration_arg, parse_header, parse_threshold,
};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Distributed load testing with a swarm of disposable workers - fan ApacheBench out over SSH and fold every bee's numbers into one verdict."
)]
pub struct BeesArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Path to a config file (TOML or JSON); bees.toml / bees.json are picked up otherwise
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Roster file holding the enlisted bees
    #[arg(long, global = true, default_value_t = default_roster_path())]
    pub roster: String,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Begin the attack on one or more URLs
    Attack(AttackArgs),
    /// Report the status of the enlisted bees
    Report,
    /// Enlist already running machines as bees
    Enlist(EnlistArgs),
    /// Forget every enlisted bee
    Disband,
}

#[derive(Debug, Args, Clone)]
pub struct AttackArgs {
    /// URL(s) to target; separate several with commas
    #[arg(long, short = 'u')]
    pub url: Option<String>,

    /// Total number of requests to make
    #[arg(long, short = 'n', default_value_t = DEFAULT_REQUESTS)]
    pub requests: u64,

    /// Number of concurrent requests to make
    #[arg(long, short = 'c', default_value_t = DEFAULT_CONCURRENT)]
    pub concurrent: u64,

    /// HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Content-Type header sent with every request
    #[arg(long = "content-type", short = 'T')]
    pub content_type: Option<String>,

    /// Cookies sent with every request, 'name=value;name2=value2'
    #[arg(long)]
    pub cookies: Option<String>,

    /// SSL/TLS cipher suite handed to the benchmark tool
    #[arg(long)]
    pub ciphers: Option<String>,

    /// Basic authentication, 'username:password'
    #[arg(long = "basic-auth", short = 'A', value_parser = parse_basic_auth)]
    pub basic_auth: Option<String>,

    /// Use HTTP keep-alive
    #[arg(long = "keep-alive", short = 'k')]
    pub keep_alive: bool,

    /// File holding the POST body; switches the attack to POST
    #[arg(long = "post-file", short = 'p')]
    pub post_file: Option<PathBuf>,

    /// How the target is primed before the attack
    #[arg(long = "sting", short = 'S', value_enum, default_value_t = PrimingMode::Sequential)]
    pub sting: PrimingMode,

    /// Store the response time percentiles in this CSV file
    #[arg(long = "csv", short = 'e')]
    pub csv: Option<PathBuf>,

    /// Upper bound for the mean time per request, in milliseconds
    #[arg(long, value_parser = parse_threshold)]
    pub tpr: Option<f64>,

    /// Lower bound for the aggregate requests per second
    #[arg(long, value_parser = parse_threshold)]
    pub rps: Option<f64>,

    /// SSH connect timeout (supports ms/s/m/h)
    #[arg(long = "connect-timeout", default_value = "10s", value_parser = parse_duration_arg)]
    pub connect_timeout: Duration,

    /// Upper bound for each remote command (supports ms/s/m/h)
    #[arg(long = "command-timeout", value_parser = parse_duration_arg)]
    pub command_timeout: Option<Duration>,

    /// Attack with these bees instead of the roster, 'instance_id=address' (repeatable)
    #[arg(long = "bee", value_parser = parse_bee)]
    pub bees: Vec<WorkerEndpoint>,

    /// SSH login used on every bee (defaults to the roster's)
    #[arg(long)]
    pub username: Option<String>,

    /// Key name used to reach the bees (~/.ssh/<key>.pem)
    #[arg(long)]
    pub key: Option<String>,

    /// Directory holding the bee keys (defaults to ~/.ssh)
    #[arg(long = "key-dir")]
    pub key_dir: Option<PathBuf>,

    /// Command run on each bee before the attack; an empty value skips it
    #[arg(long = "install-command")]
    pub install_command: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct EnlistArgs {
    /// Bee to enlist, 'instance_id=address' (repeatable)
    #[arg(long = "bee", required = true, value_parser = parse_bee)]
    pub bees: Vec<WorkerEndpoint>,

    /// SSH login used on every bee
    #[arg(long, short = 'l', default_value = DEFAULT_USERNAME)]
    pub username: String,

    /// Key name used to reach the bees (~/.ssh/<key>.pem)
    #[arg(long, short = 'k')]
    pub key: String,

    /// Availability zone the bees live in
    #[arg(long, short = 'z', default_value = DEFAULT_ZONE)]
    pub zone: String,

    /// Replace an existing roster
    #[arg(long)]
    pub force: bool,
}
