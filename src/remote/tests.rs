use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{CommandOutput, SshSettings};
use crate::attack::WorkerEndpoint;
use crate::error::{AppError, AppResult, RemoteError};

fn settings() -> SshSettings {
    let mut settings = SshSettings::new("ec2-user", PathBuf::from("/home/me/.ssh"));
    settings.connect_timeout = Duration::from_secs(7);
    settings
}

#[test]
fn ssh_args_carry_key_and_destination() -> AppResult<()> {
    let endpoint = WorkerEndpoint::new("i-1", "10.0.0.5", "swarm");
    let args = settings().ssh_args(&endpoint, "mktemp");

    let expected_key = "/home/me/.ssh/swarm.pem";
    if !args
        .windows(2)
        .any(|pair| matches!(pair, [flag, key] if flag == "-i" && key == expected_key))
    {
        return Err(AppError::validation(format!("Missing key flag: {:?}", args)));
    }
    if !args.iter().any(|arg| arg == "ConnectTimeout=7") {
        return Err(AppError::validation(format!("Missing connect timeout: {:?}", args)));
    }
    let tail: Vec<&str> = args.iter().rev().take(2).map(String::as_str).collect();
    if tail != ["mktemp", "ec2-user@10.0.0.5"] {
        return Err(AppError::validation(format!("Unexpected tail: {:?}", tail)));
    }
    Ok(())
}

#[test]
fn key_path_keeps_explicit_extension() -> AppResult<()> {
    let settings = settings();
    let path = settings.key_path("id_ed25519.key");
    if path != Some(PathBuf::from("/home/me/.ssh/id_ed25519.key")) {
        return Err(AppError::validation(format!("Unexpected key path: {:?}", path)));
    }
    if settings.key_path("  ").is_some() {
        return Err(AppError::validation("Blank credential should not produce a key"));
    }
    Ok(())
}

#[test]
fn scp_targets_home_directory() -> AppResult<()> {
    let endpoint = WorkerEndpoint::new("i-2", "bee.example", "");
    let mut settings = settings();
    settings.username = String::new();
    let args = settings.scp_args(&endpoint, Path::new("/tmp/body.json"), "body.json");

    if args.iter().any(|arg| arg == "-i") {
        return Err(AppError::validation("No key flag expected without a credential"));
    }
    let tail: Vec<&str> = args.iter().rev().take(2).map(String::as_str).collect();
    if tail != ["bee.example:body.json", "/tmp/body.json"] {
        return Err(AppError::validation(format!("Unexpected tail: {:?}", tail)));
    }
    Ok(())
}

#[test]
fn connection_level_errors_are_classified() -> AppResult<()> {
    let connect = RemoteError::Connect {
        address: "a".to_owned(),
        message: "refused".to_owned(),
    };
    let stalled = RemoteError::CommandTimeout {
        address: "a".to_owned(),
        timeout_ms: 5,
    };
    if !connect.is_connection_level() {
        return Err(AppError::validation("Connect should be connection level"));
    }
    if stalled.is_connection_level() {
        return Err(AppError::validation("Command timeout is not connection level"));
    }
    Ok(())
}

#[test]
fn command_output_success_requires_zero_exit() -> AppResult<()> {
    let output = CommandOutput {
        exit_code: Some(1),
        ..CommandOutput::default()
    };
    if output.success() {
        return Err(AppError::validation("Exit 1 is not success"));
    }
    if CommandOutput::default().success() {
        return Err(AppError::validation("Missing exit code is not success"));
    }
    Ok(())
}
