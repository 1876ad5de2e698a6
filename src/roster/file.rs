use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{Roster, RosterStore};
use crate::error::RosterError;

pub const ROSTER_FILE_NAME: &str = "roster.json";

/// Roster kept as pretty JSON in a single file.
#[derive(Debug, Clone)]
pub struct FileRosterStore {
    path: PathBuf,
}

impl FileRosterStore {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at `<base_dir>/roster.json`.
    #[must_use]
    pub fn in_dir(base_dir: &Path) -> Self {
        Self::new(base_dir.join(ROSTER_FILE_NAME))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RosterStore for FileRosterStore {
    fn load(&self) -> Result<Option<Roster>, RosterError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(RosterError::Read {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };
        let roster: Roster =
            serde_json::from_str(&content).map_err(|err| RosterError::Parse {
                path: self.path.clone(),
                source: err,
            })?;
        info!(
            "Read {} bees from the roster: {}",
            roster.bees.len(),
            roster.zone
        );
        Ok(Some(roster))
    }

    fn save(&self, roster: &Roster) -> Result<(), RosterError> {
        let wrap = |err: std::io::Error| RosterError::Write {
            path: self.path.clone(),
            source: err,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(wrap)?;
        }
        let json = serde_json::to_string_pretty(roster)
            .map_err(|err| RosterError::Serialize { source: err })?;
        std::fs::write(&self.path, json).map_err(wrap)?;
        debug!(path = %self.path.display(), "Roster saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), RosterError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(RosterError::Remove {
                path: self.path.clone(),
                source: err,
            }),
        }
    }
}
