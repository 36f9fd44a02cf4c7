//! Error types for countdown-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CountdownError {
    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

pub type Result<T> = std::result::Result<T, CountdownError>;
