use std::sync::Arc;

use tracing::{info, warn};

use crate::attack::{AggregateReport, render_lines, run_attack, verdict_line};
use crate::error::{AppError, AppResult, AttackError};
use crate::remote::{OpenSshShell, RemoteShell};
use crate::roster::{Roster, RosterStore};
use crate::system::banner;

use super::types::{AttackPlan, RunPlan};

pub(crate) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    match plan {
        RunPlan::Attack(attack) => execute_attack(attack).await,
        RunPlan::Report(store) => {
            for line in report_lines(store.load()?.as_ref()) {
                println!("{}", line);
            }
            Ok(())
        }
        RunPlan::Enlist {
            store,
            roster,
            force,
        } => enlist(&store, &roster, force),
        RunPlan::Disband(store) => disband(&store),
    }
}

async fn execute_attack(plan: AttackPlan) -> AppResult<()> {
    banner::print_cli_banner(plan.no_color);
    println!();

    let shell: Arc<dyn RemoteShell> = Arc::new(OpenSshShell::new(plan.ssh));
    let report = run_attack(
        &plan.options,
        &plan.endpoints,
        shell,
        Arc::new(plan.executor),
    )
    .await?;

    for line in render_lines(&report) {
        println!("{}", line);
    }
    println!("The swarm is awaiting new orders.");
    conclude(&report)
}

/// Prints the verdict; a rejected target fails the run.
pub(super) fn conclude(report: &AggregateReport) -> AppResult<()> {
    if let Some(line) = verdict_line(report) {
        println!("{}", line);
    }
    if report.performance_accepted == Some(false) {
        return Err(AppError::attack(AttackError::PerformanceRejected));
    }
    Ok(())
}

pub(super) fn report_lines(roster: Option<&Roster>) -> Vec<String> {
    let Some(roster) = roster.filter(|roster| !roster.bees.is_empty()) else {
        return vec!["No bees have been mobilized.".to_owned()];
    };
    let mut lines = vec![format!(
        "{} bees enlisted as {} in {} since {}.",
        roster.bees.len(),
        roster.username,
        if roster.zone.is_empty() { "an unknown zone" } else { roster.zone.as_str() },
        roster.enlisted_at.format("%Y-%m-%d %H:%M:%S UTC")
    )];
    lines.extend(
        roster
            .endpoints()
            .iter()
            .map(|bee| format!("Bee {}: enlisted @ {} (key {})", bee.id, bee.address, bee.credential_ref)),
    );
    lines
}

pub(super) fn enlist(store: &dyn RosterStore, roster: &Roster, force: bool) -> AppResult<()> {
    if !force && store.load()?.is_some_and(|existing| !existing.bees.is_empty()) {
        warn!("Bees are already assembled and awaiting orders.");
        return Ok(());
    }
    store.save(roster)?;
    info!("The swarm has assembled {} bees.", roster.bees.len());
    Ok(())
}

pub(super) fn disband(store: &dyn RosterStore) -> AppResult<()> {
    let Some(roster) = store.load()? else {
        info!("No bees have been mobilized.");
        return Ok(());
    };
    info!("Calling off the swarm.");
    store.clear()?;
    info!("Stood down {} bees.", roster.bees.len());
    Ok(())
}
