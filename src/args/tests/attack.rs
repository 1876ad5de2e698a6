use super::*;

fn attack_args(args: BeesArgs) -> AppResult<AttackArgs> {
    match args.command {
        Command::Attack(attack) => Ok(attack),
        Command::Report | Command::Enlist(_) | Command::Disband => {
            Err(AppError::validation("Expected attack subcommand"))
        }
    }
}

#[test]
fn attack_defaults() -> AppResult<()> {
    let attack = attack_args(parse_test_args(["bees", "attack", "-u", "http://target/"])?)?;
    if attack.requests != 1000 || attack.concurrent != 100 {
        return Err(AppError::validation(format!(
            "Unexpected load defaults: {} / {}",
            attack.requests, attack.concurrent
        )));
    }
    if attack.sting != PrimingMode::Sequential {
        return Err(AppError::validation("Priming should default to sequential"));
    }
    if attack.connect_timeout != Duration::from_secs(10) {
        return Err(AppError::validation("Connect timeout should default to 10s"));
    }
    if attack.keep_alive || attack.csv.is_some() || attack.tpr.is_some() || attack.rps.is_some() {
        return Err(AppError::validation("Optional flags should be unset"));
    }
    Ok(())
}

#[test]
fn attack_full_flag_set() -> AppResult<()> {
    let attack = attack_args(parse_test_args([
        "bees",
        "attack",
        "--url",
        "http://a/,http://b/",
        "-n",
        "500",
        "-c",
        "20",
        "-H",
        "X-Trace: 1",
        "-H",
        "Accept: */*",
        "-T",
        "application/json",
        "--cookies",
        "a=1",
        "-A",
        "user:pass",
        "-k",
        "-p",
        "body.json",
        "-S",
        "parallel",
        "-e",
        "out.csv",
        "--tpr",
        "120",
        "--rps",
        "900.5",
        "--command-timeout",
        "2m",
        "--bee",
        "i-1=10.0.0.1",
        "--bee",
        "i-2=10.0.0.2",
        "--username",
        "ubuntu",
        "--key",
        "swarm",
    ])?)?;

    if attack.url.as_deref() != Some("http://a/,http://b/") {
        return Err(AppError::validation("Unexpected url list"));
    }
    if attack.requests != 500 || attack.concurrent != 20 {
        return Err(AppError::validation("Unexpected load"));
    }
    if attack.headers.len() != 2 {
        return Err(AppError::validation(format!(
            "Unexpected headers: {:?}",
            attack.headers
        )));
    }
    if attack.basic_auth.as_deref() != Some("user:pass") || !attack.keep_alive {
        return Err(AppError::validation("Unexpected auth or keep-alive"));
    }
    if attack.sting != PrimingMode::Parallel {
        return Err(AppError::validation("Expected parallel priming"));
    }
    if !matches!(attack.tpr, Some(tpr) if (tpr - 120.0).abs() < f64::EPSILON) {
        return Err(AppError::validation("Unexpected tpr"));
    }
    if attack.command_timeout != Some(Duration::from_secs(120)) {
        return Err(AppError::validation("Unexpected command timeout"));
    }
    let ids: Vec<&str> = attack.bees.iter().map(|bee| bee.id.as_str()).collect();
    if ids != ["i-1", "i-2"] {
        return Err(AppError::validation(format!("Unexpected bees: {:?}", ids)));
    }
    if attack.username.as_deref() != Some("ubuntu") || attack.key.as_deref() != Some("swarm") {
        return Err(AppError::validation("Unexpected ssh identity"));
    }
    Ok(())
}

#[test]
fn attack_rejects_bad_bee() -> AppResult<()> {
    if parse_test_args(["bees", "attack", "--bee", "no-address"]).is_ok() {
        return Err(AppError::validation("Expected Err for malformed bee"));
    }
    Ok(())
}

#[test]
fn attack_rejects_unknown_sting_mode() -> AppResult<()> {
    if parse_test_args(["bees", "attack", "-S", "sometimes"]).is_ok() {
        return Err(AppError::validation("Expected Err for unknown sting mode"));
    }
    Ok(())
}
