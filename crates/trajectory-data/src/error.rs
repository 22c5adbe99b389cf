//! Error types for trajectory ingestion

use std::path::PathBuf;
use thiserror::Error;

/// Malformed trajectory text.
///
/// Line numbers are 1-based, as an editor would show them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// The input has no content at all
    #[error("trajectory data is empty")]
    Empty,

    /// A header line is missing
    #[error("line {line}: missing {field}")]
    MissingHeader {
        /// Line where the header was expected
        line: usize,
        /// Header name (`body count` or `step count`)
        field: &'static str,
    },

    /// A header count is not a positive integer
    #[error("line {line}: {field} must be a positive integer, got {text:?}")]
    InvalidCount {
        /// Offending line
        line: usize,
        /// Header name
        field: &'static str,
        /// Raw line content
        text: String,
    },

    /// A numeric field failed to parse or is not finite
    #[error("line {line}: invalid number {text:?}")]
    InvalidNumber {
        /// Offending line
        line: usize,
        /// The token that failed to parse
        text: String,
    },

    /// A position line does not hold exactly three coordinates
    #[error("line {line}: expected 3 coordinates, found {found}")]
    WrongFieldCount {
        /// Offending line
        line: usize,
        /// Number of whitespace-separated fields present
        found: usize,
    },

    /// The file length disagrees with the declared counts
    #[error("expected {expected} lines for {num_bodies} bodies x {num_steps} steps, found {found}")]
    LineCount {
        /// `2 + bodies + bodies * steps`
        expected: usize,
        /// Lines actually present (trailing blank lines excluded)
        found: usize,
        /// Declared body count
        num_bodies: usize,
        /// Declared step count
        num_steps: usize,
    },
}

impl FormatError {
    /// Line the error refers to, if it concerns a single line
    pub fn line(&self) -> Option<usize> {
        match self {
            FormatError::MissingHeader { line, .. }
            | FormatError::InvalidCount { line, .. }
            | FormatError::InvalidNumber { line, .. }
            | FormatError::WrongFieldCount { line, .. } => Some(*line),
            FormatError::Empty | FormatError::LineCount { .. } => None,
        }
    }
}

/// Failure to load a trajectory file from disk
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file was read but its content is malformed
    #[error("malformed trajectory file {path}: {source}")]
    Format {
        /// File that was being parsed
        path: PathBuf,
        /// Parse failure
        #[source]
        source: FormatError,
    },
}
