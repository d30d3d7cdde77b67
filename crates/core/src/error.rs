//! Error types for the subword codec.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the codec crates.
#[derive(Error, Debug)]
pub enum BpeError {
    /// Persisted merge rules could not be parsed.
    ///
    /// Fatal for the load that produced it; the table is never truncated.
    #[error("Corrupt rule table at line {line}: {reason}")]
    RuleTableCorrupt { line: usize, reason: String },

    /// A word-count dictionary line could not be parsed
    #[error("Malformed corpus at line {line}: {reason}")]
    MalformedCorpus { line: usize, reason: String },

    /// A training word contains the end-of-word suffix, so symbols built
    /// from it could not be rendered unambiguously
    #[error("Word '{0}' contains the reserved end-of-word suffix '</w>'")]
    ReservedSuffix(String),

    /// A merge rule was added twice to the same table
    #[error("Duplicate merge rule: {0}")]
    DuplicateRule(String),

    /// I/O error with file context
    #[error("I/O error for {path}: {err}")]
    Io {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid glossary pattern
    #[error("Invalid glossary pattern: {0}")]
    Glossary(#[from] regex::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Symbol table ran out of ids
    #[error("Vocabulary size exceeded maximum of {max}")]
    VocabularyOverflow { max: usize },

    /// Symbol lookup by the API failed
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),
}

impl BpeError {
    /// Build a [`BpeError::RuleTableCorrupt`] for a 1-based line number.
    pub fn corrupt(line: usize, reason: impl Into<String>) -> Self {
        Self::RuleTableCorrupt {
            line,
            reason: reason.into(),
        }
    }

    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            err,
        }
    }
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, BpeError>;
