use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid header format: '{value}'. Expected 'Key: Value'")]
    InvalidHeaderFormat { value: String },
    #[error("Invalid bee '{value}'. Expected 'instance_id=address'.")]
    InvalidBeeFormat { value: String },
    #[error("Invalid basic auth '{value}'. Expected 'username:password'.")]
    InvalidBasicAuth { value: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Invalid threshold '{value}': {source}")]
    InvalidThreshold {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
    #[error("Threshold must be a finite, non-negative number (got '{value}').")]
    ThresholdOutOfRange { value: String },
    #[error("Missing URL (set --url or provide in config).")]
    MissingUrl,
    #[error("No bees have been mobilized.")]
    EmptyRoster,
    #[error("Missing SSH username (set --username or enlist bees with one).")]
    MissingUsername,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
