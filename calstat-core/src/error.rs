//! Error types for calstat.

use thiserror::Error;

/// A raw event record that could not be turned into an [`Event`](crate::event::Event).
///
/// Raised per record. Callers decide whether to skip the record or abort the batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedRecordError {
    #[error("Event record is not a JSON object")]
    NotAnObject,

    #[error("Event record is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Event record has an invalid '{field}' time: {value}")]
    InvalidTime { field: &'static str, value: String },
}

/// Errors that can occur in calstat operations.
#[derive(Error, Debug)]
pub enum CalstatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed event record: {0}")]
    MalformedRecord(#[from] MalformedRecordError),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CalstatError {
    fn from(err: serde_json::Error) -> Self {
        CalstatError::Serialization(err.to_string())
    }
}

/// Result type alias for calstat operations.
pub type CalstatResult<T> = Result<T, CalstatError>;
