// src/error.rs
use thiserror::Error;

use crate::models::RecordId;

/// A zip code value that is present but is not an integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("zip code {value:?} cannot be parsed as an integer")]
pub struct ParseError {
    pub value: String,
}

/// Why a phone value resolved to "no phone". Never surfaced as a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneUnrecognized {
    #[error("no digits left after stripping punctuation")]
    Empty,
    #[error("{0:?} is not numeric")]
    NotNumeric(String),
    #[error("{0} digits does not match a known phone layout")]
    UnsupportedLength(usize),
}

/// A record rejected at the normalization boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record {record_id}: {source}")]
pub struct RecordError {
    pub record_id: RecordId,
    #[source]
    pub source: ParseError,
}

#[derive(Debug, Error)]
pub enum DedupError {
    #[error(
        "{} record(s) failed normalization, first: {}",
        .errors.len(),
        .errors.first().map(ToString::to_string).unwrap_or_default()
    )]
    Normalization { errors: Vec<RecordError> },
    #[error("record id {0} appears more than once in the input")]
    DuplicateRecordId(RecordId),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("block clustering task failed: {0}")]
    BlockTask(String),
}
