use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Failed to connect to {address}: {message}")]
    Connect { address: String, message: String },
    #[error("Timed out after {timeout_ms}ms connecting to {address}.")]
    ConnectTimeout { address: String, timeout_ms: u64 },
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("Remote command on {address} did not finish within {timeout_ms}ms.")]
    CommandTimeout { address: String, timeout_ms: u64 },
    #[error("Failed to upload '{path}' to {address}: {message}")]
    Upload {
        path: PathBuf,
        address: String,
        message: String,
    },
    #[error("Upload path '{path}' has no file name.")]
    UploadMissingFileName { path: PathBuf },
    #[error("Session to {address} is already closed.")]
    SessionClosed { address: String },
}

impl RemoteError {
    /// True when the error means the bee could not be reached at all.
    #[must_use]
    pub const fn is_connection_level(&self) -> bool {
        matches!(
            self,
            RemoteError::Connect { .. }
                | RemoteError::ConnectTimeout { .. }
                | RemoteError::Spawn { .. }
                | RemoteError::SessionClosed { .. }
        )
    }
}
