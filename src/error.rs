//! Error types for Timeline Atlas

use thiserror::Error;

/// Errors that can occur during extraction and feature building
#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("malformed timeline document: {0}")]
    MalformedInput(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid timestamp in {field}: {value:?}")]
    InvalidTimestamp {
        field: &'static str,
        value: String,
    },

    #[error("no activity segments to derive a map center from")]
    EmptyDataset,
}
