use crate::attack::{AttackOptions, ExecutorSettings, WorkerEndpoint};
use crate::remote::SshSettings;
use crate::roster::{FileRosterStore, Roster};

/// Everything an attack needs once the CLI, config and roster are merged.
#[derive(Debug)]
pub(in crate::entry) struct AttackPlan {
    pub(super) options: AttackOptions,
    pub(super) endpoints: Vec<WorkerEndpoint>,
    pub(super) ssh: SshSettings,
    pub(super) executor: ExecutorSettings,
    pub(super) no_color: bool,
}

#[derive(Debug)]
pub(in crate::entry) enum RunPlan {
    Attack(AttackPlan),
    Report(FileRosterStore),
    Enlist {
        store: FileRosterStore,
        roster: Roster,
        force: bool,
    },
    Disband(FileRosterStore),
}
