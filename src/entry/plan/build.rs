use std::path::PathBuf;

use clap::ArgMatches;

use crate::args::{AttackArgs, BeesArgs, Command, EnlistArgs, default_key_dir};
use crate::attack::{AttackOptions, ExecutorSettings, Thresholds};
use crate::error::{AppError, AppResult, ValidationError};
use crate::remote::SshSettings;
use crate::roster::{FileRosterStore, Roster, RosterStore};

use super::types::{AttackPlan, RunPlan};

/// Merges `--config` (or `bees.toml` / `bees.json`) into the parsed args.
pub(in crate::entry) fn apply_config_file(args: &mut BeesArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(args, matches, &config)?;
    }
    Ok(())
}

pub(in crate::entry) fn build_plan(args: BeesArgs) -> AppResult<RunPlan> {
    let store = FileRosterStore::new(PathBuf::from(&args.roster));
    match args.command {
        Command::Attack(attack) => Ok(RunPlan::Attack(build_attack(
            attack,
            &store,
            args.no_color,
        )?)),
        Command::Report => Ok(RunPlan::Report(store)),
        Command::Enlist(enlist) => Ok(build_enlist(enlist, store)),
        Command::Disband => Ok(RunPlan::Disband(store)),
    }
}

pub(super) fn build_attack(
    args: AttackArgs,
    store: &dyn RosterStore,
    no_color: bool,
) -> AppResult<AttackPlan> {
    let urls = args
        .url
        .as_deref()
        .map(AttackOptions::split_urls)
        .unwrap_or_default();
    if urls.is_empty() {
        tracing::error!("Missing URL (set --url or provide in config).");
        return Err(AppError::validation(ValidationError::MissingUrl));
    }

    // The roster is only consulted for what the command line leaves open.
    let roster = if args.bees.is_empty() || args.username.is_none() {
        store.load()?
    } else {
        None
    };

    let mut endpoints = if args.bees.is_empty() {
        roster.as_ref().map(Roster::endpoints).unwrap_or_default()
    } else {
        args.bees
    };
    if endpoints.is_empty() {
        return Err(AppError::validation(ValidationError::EmptyRoster));
    }
    if let Some(key) = args.key.as_deref() {
        for endpoint in &mut endpoints {
            endpoint.credential_ref = key.to_owned();
        }
    }

    let username = args
        .username
        .or_else(|| roster.map(|roster| roster.username))
        .filter(|username| !username.trim().is_empty())
        .ok_or_else(|| AppError::validation(ValidationError::MissingUsername))?;

    let mut ssh = SshSettings::new(&username, args.key_dir.unwrap_or_else(default_key_dir));
    ssh.connect_timeout = args.connect_timeout;
    ssh.command_timeout = args.command_timeout;

    let executor = args
        .install_command
        .as_deref()
        .map_or_else(ExecutorSettings::default, ExecutorSettings::with_install_command);

    let options = AttackOptions {
        urls,
        total_requests: args.requests,
        concurrency: args.concurrent,
        headers: args.headers,
        content_type: args.content_type,
        cookies: args.cookies,
        ciphers: args.ciphers,
        basic_auth: args.basic_auth,
        keep_alive: args.keep_alive,
        post_file: args.post_file,
        priming: args.sting,
        thresholds: Thresholds {
            max_mean_ms: args.tpr,
            min_rps: args.rps,
        },
        csv_path: args.csv,
    };

    Ok(AttackPlan {
        options,
        endpoints,
        ssh,
        executor,
        no_color,
    })
}

fn build_enlist(args: EnlistArgs, store: FileRosterStore) -> RunPlan {
    let roster = Roster::new(&args.username, &args.key, &args.zone, args.bees);
    RunPlan::Enlist {
        store,
        roster,
        force: args.force,
    }
}
