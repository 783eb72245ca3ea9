//! Error types for CLDATA to G-code translation.

use std::path::PathBuf;
use thiserror::Error;

/// Error codes for CLDATA processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// File not found (-1)
    FileNotFound = -1,
    /// Empty file (-2)
    EmptyFile = -2,
    /// General parse error (-3)
    ParseError = -3,
    /// Degenerate tool-axis vector (E100)
    DegenerateVector = 100,
    /// Circular move outside the XY plane (E101)
    UnsupportedPlane = 101,
}

/// Main error type for the postprocessor.
///
/// Record-level variants carry the 1-based source line so the caller can
/// locate and fix the offending CLDATA.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Empty file: {path}")]
    EmptyFile { path: PathBuf },

    #[error("Record {line}: {keyword} expects {expected} fields, found {found}: {record}")]
    ArityMismatch {
        line: usize,
        keyword: String,
        expected: &'static str,
        found: usize,
        record: String,
    },

    #[error("Record {line}, field {field}: invalid numeric value '{value}'")]
    InvalidNumber {
        line: usize,
        field: usize,
        value: String,
    },

    #[error("Record {line}: tool-axis vector ({i}, {j}, {k}) has near-zero magnitude")]
    DegenerateVector {
        line: usize,
        i: f64,
        j: f64,
        k: f64,
    },

    #[error("Record {line}: circular move lies outside the XY plane (normal ({i}, {j}, {k}))")]
    UnsupportedPlane {
        line: usize,
        i: f64,
        j: f64,
        k: f64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PostError {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PostError::FileNotFound { .. } => ErrorCode::FileNotFound,
            PostError::EmptyFile { .. } => ErrorCode::EmptyFile,
            PostError::ArityMismatch { .. } => ErrorCode::ParseError,
            PostError::InvalidNumber { .. } => ErrorCode::ParseError,
            PostError::DegenerateVector { .. } => ErrorCode::DegenerateVector,
            PostError::UnsupportedPlane { .. } => ErrorCode::UnsupportedPlane,
            PostError::Io(_) => ErrorCode::FileNotFound,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }
}

/// Result type alias for postprocessor operations.
pub type Result<T> = std::result::Result<T, PostError>;
