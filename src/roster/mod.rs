//! The enlisted fleet, owned outside the attack core.
//!
//! `enlist` writes it, `report` reads it, `disband` clears it; the attack
//! only ever receives the endpoint list resolved from it.

mod file;


use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attack::WorkerEndpoint;
use crate::error::RosterError;

pub use file::{FileRosterStore, ROSTER_FILE_NAME};

/// Who the bees are and how to reach them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    /// Login used for every bee.
    pub username: String,
    /// Default key name for bees that do not carry their own.
    pub key_name: String,
    #[serde(default)]
    pub zone: String,
    pub enlisted_at: DateTime<Utc>,
    pub bees: Vec<WorkerEndpoint>,
}

impl Roster {
    #[must_use]
    pub fn new(username: &str, key_name: &str, zone: &str, bees: Vec<WorkerEndpoint>) -> Self {
        Self {
            username: username.to_owned(),
            key_name: key_name.to_owned(),
            zone: zone.to_owned(),
            enlisted_at: Utc::now(),
            bees,
        }
    }

    /// Endpoints with the roster key filled in where a bee has none.
    #[must_use]
    pub fn endpoints(&self) -> Vec<WorkerEndpoint> {
        self.bees
            .iter()
            .map(|bee| {
                let mut endpoint = bee.clone();
                if endpoint.credential_ref.trim().is_empty() {
                    endpoint.credential_ref.clone_from(&self.key_name);
                }
                endpoint
            })
            .collect()
    }
}

/// Persistence for the roster.
pub trait RosterStore {
    /// Returns `None` when nothing has been enlisted.
    ///
    /// # Errors
    ///
    /// Returns an error when an existing roster cannot be read or parsed.
    fn load(&self) -> Result<Option<Roster>, RosterError>;

    /// # Errors
    ///
    /// Returns an error when the roster cannot be written.
    fn save(&self, roster: &Roster) -> Result<(), RosterError>;

    /// Forgets the roster. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error when an existing roster cannot be removed.
    fn clear(&self) -> Result<(), RosterError>;
}
