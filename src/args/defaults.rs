use std::path::PathBuf;

use crate::roster::ROSTER_FILE_NAME;

pub(crate) const DEFAULT_REQUESTS: u64 = 1000;
pub(crate) const DEFAULT_CONCURRENT: u64 = 100;
pub(crate) const DEFAULT_USERNAME: &str = "ec2-user";
pub(crate) const DEFAULT_ZONE: &str = "us-east-1d";

pub(crate) fn default_roster_path() -> String {
    default_base_dir()
        .join(ROSTER_FILE_NAME)
        .to_string_lossy()
        .into_owned()
}

/// Where `<key>.pem` files are looked up.
pub(crate) fn default_key_dir() -> PathBuf {
    user_home_dir().map_or_else(|| PathBuf::from(".ssh"), |home| home.join(".ssh"))
}

fn default_base_dir() -> PathBuf {
    if let Some(home) = user_home_dir() {
        return home.join(".bees");
    }

    PathBuf::from(".bees")
}

fn user_home_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        if let Some(value) = std::env::var_os("USERPROFILE") {
            return Some(PathBuf::from(value));
        }
        let drive = std::env::var_os("HOMEDRIVE");
        let path = std::env::var_os("HOMEPATH");
        if let (Some(drive), Some(path)) = (drive, path) {
            let mut full = PathBuf::from(drive);
            full.push(path);
            return Some(full);
        }
    }

    std::env::var_os("HOME").map(PathBuf::from)
}
