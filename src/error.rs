//! Error types for effort-extract

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting a dataset
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Line {line} is not a timeline: expected an array or an object with a `timeline` array, found {found}")]
    InvalidTimeline { line: usize, found: &'static str },

    #[error("Subject {subject}, event {position}: field `{field}` {problem}")]
    InvalidField {
        subject: usize,
        position: usize,
        field: &'static str,
        problem: String,
    },

    #[error("Cannot derive output file names from {}", .0.display())]
    OutputPath(PathBuf),
}

impl ExtractError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExtractError::Io {
            path: path.into(),
            source,
        }
    }
}
