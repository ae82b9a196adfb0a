//! Error types for the Datavyu to Supercoder converter

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Errors that abort a whole file or a whole batch
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Input directory does not exist: {0}")]
    MissingInputDir(PathBuf),
}

impl ConvertError {
    /// Attach the offending path to an I/O error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }
}

/// What was wrong with a single quarantined input row
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowErrorKind {
    #[error("expected 4 fields, found {found}")]
    FieldCount { found: usize },

    #[error("field '{field}' is not a non-negative integer: {value:?}")]
    InvalidInteger { field: &'static str, value: String },
}

/// A malformed input row, kept out of the output but reported
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("line {line}: {kind}")]
pub struct RowError {
    /// 1-based line number in the source file (the header is line 1)
    pub line: usize,
    #[serde(flatten)]
    pub kind: RowErrorKind,
}
