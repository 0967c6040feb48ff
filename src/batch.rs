//! Multi-file aggregation
//!
//! Folds a batch of uploaded documents into one concatenated record set.
//! A file that fails to extract contributes an error labeled with its name
//! instead of aborting the batch; the caller reports the errors and renders
//! whatever parsed.

use std::fmt;

use crate::error::TimelineError;
use crate::extractor::extract;
use crate::types::TimelineData;

/// An extraction failure labeled with the file it came from.
#[derive(Debug)]
pub struct SourceError {
    pub file: String,
    pub error: TimelineError,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.error)
    }
}

/// Outcome of a batch extraction: records from every file that parsed plus
/// one error per file that did not.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub data: TimelineData,
    pub errors: Vec<SourceError>,
}

/// Extract every file in submission order, concatenating results.
pub fn extract_batch<I, N, B>(files: I) -> BatchOutcome
where
    I: IntoIterator<Item = (N, B)>,
    N: Into<String>,
    B: AsRef<[u8]>,
{
    files
        .into_iter()
        .fold(BatchOutcome::default(), |mut outcome, (name, bytes)| {
            match extract(bytes.as_ref()) {
                Ok(data) => outcome.data.append(data),
                Err(error) => outcome.errors.push(SourceError {
                    file: name.into(),
                    error,
                }),
            }
            outcome
        })
}
