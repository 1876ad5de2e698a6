use thiserror::Error;

use super::{AttackError, ConfigError, RemoteError, RosterError, ValidationError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("HTTP client error: {source}")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Attack error: {0}")]
    Attack(#[from] AttackError),
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),
    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn attack<E>(error: E) -> Self
    where
        E: Into<AttackError>,
    {
        error.into().into()
    }

    pub fn remote<E>(error: E) -> Self
    where
        E: Into<RemoteError>,
    {
        error.into().into()
    }

    pub fn roster<E>(error: E) -> Self
    where
        E: Into<RosterError>,
    {
        error.into().into()
    }
}
