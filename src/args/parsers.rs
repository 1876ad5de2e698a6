use std::time::Duration;

use crate::attack::WorkerEndpoint;
use crate::error::{AppError, AppResult, ValidationError};

pub(crate) fn parse_header(s: &str) -> Result<(String, String), ValidationError> {
    match s.split_once(':') {
        Some((key, value)) => Ok((key.trim().to_owned(), value.trim().to_owned())),
        None => Err(ValidationError::InvalidHeaderFormat {
            value: s.to_owned(),
        }),
    }
}

/// `instance_id=address`; the key is filled in later from `--key` or the roster.
pub(crate) fn parse_bee(s: &str) -> Result<WorkerEndpoint, ValidationError> {
    let invalid = || ValidationError::InvalidBeeFormat {
        value: s.to_owned(),
    };
    let (id, address) = s.split_once('=').ok_or_else(invalid)?;
    let id = id.trim();
    let address = address.trim();
    if id.is_empty() || address.is_empty() {
        return Err(invalid());
    }
    Ok(WorkerEndpoint::new(id, address, ""))
}

pub(crate) fn parse_basic_auth(s: &str) -> Result<String, ValidationError> {
    match s.split_once(':') {
        Some((user, _password)) if !user.trim().is_empty() => Ok(s.to_owned()),
        Some(_) | None => Err(ValidationError::InvalidBasicAuth {
            value: s.to_owned(),
        }),
    }
}

pub(crate) fn parse_threshold(s: &str) -> Result<f64, ValidationError> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|err| ValidationError::InvalidThreshold {
            value: s.to_owned(),
            source: err,
        })?;
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::ThresholdOutOfRange {
            value: s.to_owned(),
        });
    }
    Ok(value)
}

pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    parse_duration(s).map_err(AppError::validation)
}

pub(crate) fn parse_duration(s: &str) -> Result<Duration, ValidationError> {
    let value = s.trim();
    if value.is_empty() {
        return Err(ValidationError::DurationEmpty);
    }

    let mut digits_len = 0usize;
    for ch in value.chars() {
        if ch.is_ascii_digit() {
            digits_len = digits_len.saturating_add(1);
        } else {
            break;
        }
    }
    if digits_len == 0 {
        return Err(ValidationError::InvalidDurationFormat {
            value: value.to_owned(),
        });
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part
        .parse()
        .map_err(|err| ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })?;

    let unit = if unit_part.is_empty() { "s" } else { unit_part };
    let duration = match unit {
        "ms" => Duration::from_millis(number),
        "s" => Duration::from_secs(number),
        "m" => {
            let secs = number
                .checked_mul(60)
                .ok_or(ValidationError::DurationOverflow)?;
            Duration::from_secs(secs)
        }
        "h" => {
            let secs = number
                .checked_mul(60)
                .and_then(|seconds| seconds.checked_mul(60))
                .ok_or(ValidationError::DurationOverflow)?;
            Duration::from_secs(secs)
        }
        _ => {
            return Err(ValidationError::InvalidDurationUnit {
                unit: unit.to_owned(),
            });
        }
    };

    if duration.as_millis() == 0 {
        return Err(ValidationError::DurationZero);
    }

    Ok(duration)
}
