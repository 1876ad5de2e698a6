use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{
    AttackArgs, BeesArgs, Command, parse_basic_auth, parse_bee, parse_header, parse_threshold,
};
use crate::attack::WorkerEndpoint;
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments. Values given on the
/// command line always win.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(args: &mut BeesArgs, matches: &ArgMatches, config: &ConfigFile) -> AppResult<()> {
    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    if let Command::Attack(attack) = &mut args.command
        && let Some(attack_matches) = matches.subcommand_matches("attack")
    {
        apply_attack(attack, attack_matches, config)?;
    }
    Ok(())
}

fn apply_attack(args: &mut AttackArgs, matches: &ArgMatches, config: &ConfigFile) -> AppResult<()> {
    if !is_cli(matches, "url")
        && let Some(urls) = config.url.as_ref()
    {
        args.url = Some(urls.joined());
    }

    if !is_cli(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = ensure_positive(requests, "requests")?;
    }

    if !is_cli(matches, "concurrent")
        && let Some(concurrent) = config.concurrent
    {
        args.concurrent = ensure_positive(concurrent, "concurrent")?;
    }

    if !is_cli(matches, "headers")
        && let Some(headers) = config.headers.as_ref()
    {
        args.headers = parse_headers(headers)?;
    }

    if !is_cli(matches, "content_type")
        && let Some(content_type) = config.content_type.clone()
    {
        args.content_type = Some(content_type);
    }

    if !is_cli(matches, "cookies")
        && let Some(cookies) = config.cookies.clone()
    {
        args.cookies = Some(cookies);
    }

    if !is_cli(matches, "ciphers")
        && let Some(ciphers) = config.ciphers.clone()
    {
        args.ciphers = Some(ciphers);
    }

    if !is_cli(matches, "basic_auth")
        && let Some(basic_auth) = config.basic_auth.as_deref()
    {
        args.basic_auth = Some(
            parse_basic_auth(basic_auth)
                .map_err(|err| AppError::config(ConfigError::InvalidBasicAuth { source: err }))?,
        );
    }

    if !is_cli(matches, "keep_alive")
        && let Some(keep_alive) = config.keep_alive
    {
        args.keep_alive = keep_alive;
    }

    if !is_cli(matches, "post_file")
        && let Some(path) = config.post_file.clone()
    {
        args.post_file = Some(path);
    }

    if !is_cli(matches, "sting")
        && let Some(sting) = config.sting
    {
        args.sting = sting;
    }

    if !is_cli(matches, "csv")
        && let Some(path) = config.csv.clone()
    {
        args.csv = Some(path);
    }

    if !is_cli(matches, "tpr")
        && let Some(tpr) = config.tpr
    {
        args.tpr = Some(ensure_threshold(tpr, "tpr")?);
    }

    if !is_cli(matches, "rps")
        && let Some(rps) = config.rps
    {
        args.rps = Some(ensure_threshold(rps, "rps")?);
    }

    if !is_cli(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = timeout.to_duration("connect_timeout")?;
    }

    if !is_cli(matches, "command_timeout")
        && let Some(timeout) = config.command_timeout.as_ref()
    {
        args.command_timeout = Some(timeout.to_duration("command_timeout")?);
    }

    if !is_cli(matches, "bees")
        && let Some(bees) = config.bees.as_ref()
    {
        args.bees = parse_bees(bees)?;
    }

    if !is_cli(matches, "username")
        && let Some(username) = config.username.clone()
    {
        args.username = Some(username);
    }

    if !is_cli(matches, "key")
        && let Some(key) = config.key.clone()
    {
        args.key = Some(key);
    }

    if !is_cli(matches, "key_dir")
        && let Some(key_dir) = config.key_dir.clone()
    {
        args.key_dir = Some(key_dir);
    }

    if !is_cli(matches, "install_command")
        && let Some(command) = config.install_command.clone()
    {
        args.install_command = Some(command);
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive(value: u64, field: &'static str) -> AppResult<u64> {
    if value == 0 {
        return Err(AppError::config(ConfigError::FieldMustBePositive { field }));
    }
    Ok(value)
}

fn ensure_threshold(value: f64, field: &'static str) -> AppResult<f64> {
    parse_threshold(&value.to_string())
        .map_err(|err| AppError::config(ConfigError::InvalidThreshold { field, source: err }))
}

fn parse_headers(headers: &[String]) -> AppResult<Vec<(String, String)>> {
    let mut parsed = Vec::with_capacity(headers.len());
    for header in headers {
        parsed.push(
            parse_header(header)
                .map_err(|err| AppError::config(ConfigError::InvalidHeader { source: err }))?,
        );
    }
    Ok(parsed)
}

fn parse_bees(entries: &[String]) -> AppResult<Vec<WorkerEndpoint>> {
    let mut parsed = Vec::with_capacity(entries.len());
    for entry in entries {
        parsed.push(
            parse_bee(entry)
                .map_err(|err| AppError::config(ConfigError::InvalidBee { source: err }))?,
        );
    }
    Ok(parsed)
}
