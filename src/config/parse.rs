use std::time::Duration;

use crate::args::parse_duration;
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

pub(crate) fn parse_duration_value(field: &'static str, value: &str) -> AppResult<Duration> {
    parse_duration(value)
        .map_err(|err| AppError::config(ConfigError::InvalidDuration { field, source: err }))
}

pub(crate) fn seconds_to_duration(field: &'static str, secs: u64) -> AppResult<Duration> {
    if secs == 0 {
        return Err(AppError::config(ConfigError::InvalidDuration {
            field,
            source: ValidationError::DurationZero,
        }));
    }
    Ok(Duration::from_secs(secs))
}
