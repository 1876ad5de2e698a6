mod app;
mod attack;
mod config;
mod remote;
mod roster;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use attack::{AttackError, ConfigurationError, DispatchFailure};
pub use config::ConfigError;
pub use remote::RemoteError;
pub use roster::RosterError;
pub use validation::ValidationError;
