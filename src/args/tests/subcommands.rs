use super::*;

#[test]
fn enlist_requires_bees_and_key() -> AppResult<()> {
    if parse_test_args(["bees", "enlist", "--key", "swarm"]).is_ok() {
        return Err(AppError::validation("Expected Err without bees"));
    }
    if parse_test_args(["bees", "enlist", "--bee", "i-1=10.0.0.1"]).is_ok() {
        return Err(AppError::validation("Expected Err without key"));
    }
    Ok(())
}

#[test]
fn enlist_defaults() -> AppResult<()> {
    let args = parse_test_args(["bees", "enlist", "--bee", "i-1=10.0.0.1", "-k", "swarm"])?;
    match args.command {
        Command::Enlist(enlist) => {
            if enlist.username != "ec2-user" || enlist.zone != "us-east-1d" {
                return Err(AppError::validation(format!(
                    "Unexpected defaults: {} / {}",
                    enlist.username, enlist.zone
                )));
            }
            if enlist.force {
                return Err(AppError::validation("Force should be off"));
            }
            Ok(())
        }
        Command::Attack(_) | Command::Report | Command::Disband => {
            Err(AppError::validation("Expected enlist subcommand"))
        }
    }
}

#[test]
fn global_flags_follow_the_subcommand() -> AppResult<()> {
    let args = parse_test_args([
        "bees",
        "report",
        "--roster",
        "/tmp/bees/roster.json",
        "--verbose",
        "--no-color",
    ])?;
    if !matches!(args.command, Command::Report) {
        return Err(AppError::validation("Expected report subcommand"));
    }
    if args.roster != "/tmp/bees/roster.json" || !args.verbose || !args.no_color {
        return Err(AppError::validation("Global flags were not applied"));
    }
    Ok(())
}

#[test]
fn roster_defaults_to_home_dir() -> AppResult<()> {
    let args = parse_test_args(["bees", "disband"])?;
    if !args.roster.ends_with("roster.json") || !args.roster.contains(".bees") {
        return Err(AppError::validation(format!(
            "Unexpected roster path: {}",
            args.roster
        )));
    }
    Ok(())
}

#[test]
fn missing_subcommand_is_an_error() -> AppResult<()> {
    if parse_test_args(["bees"]).is_ok() {
        return Err(AppError::validation("Expected Err without subcommand"));
    }
    Ok(())
}
