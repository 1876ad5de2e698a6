mod plan;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::BeesArgs;
use crate::error::AppResult;
use plan::{apply_config_file, build_plan, execute_plan};

/// Runs the `bees` command line.
///
/// # Errors
///
/// Returns an error when arguments or config are invalid, when the attack
/// aborts, or when the target fails the performance check.
pub fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;
    apply_config_file(&mut args, &matches)?;

    crate::system::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args))
}

fn parse_args() -> AppResult<(BeesArgs, ArgMatches)> {
    let matches = BeesArgs::command().get_matches();
    let args = BeesArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

async fn run_async(args: BeesArgs) -> AppResult<()> {
    let plan = build_plan(args)?;
    execute_plan(plan).await
}
