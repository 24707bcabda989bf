//! Error types for the configuration migration.
//!
//! The run is fail-fast: every error here aborts the whole migration.
//!
//! - [`ReadError`] - Input resource and header errors
//! - [`FieldParseError`] - Malformed JSON in a jsonb-bound column
//! - [`WriteError`] - Output resource errors
//! - [`MigrationError`] - Top-level error returned by the pipeline
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Input Errors
// =============================================================================

/// Errors while opening or reading the input CSV.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The input file does not exist.
    #[error("Input file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// Failed to read file.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV.
    #[error("Invalid CSV format: {0}")]
    Csv(#[from] csv::Error),

    /// Required columns are absent from the header row.
    #[error("Missing column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The input has no header row.
    #[error("Input CSV is empty")]
    EmptyFile,

    /// The detected charset has no decoder.
    #[error("Unsupported input encoding: '{0}'")]
    UnsupportedEncoding(String),

    /// The input holds byte sequences that are invalid in its encoding.
    #[error("Input is not valid {0}")]
    Malformed(String),
}

// =============================================================================
// Field Parse Errors
// =============================================================================

/// A jsonb-bound field whose text is not valid JSON.
#[derive(Debug, Clone, Error)]
#[error("Line {line}, column '{column}' (value '{value}'): {message}")]
pub struct FieldParseError {
    /// 1-based line in the input (the header is line 1).
    pub line: usize,
    pub column: String,
    pub value: String,
    pub message: String,
}

impl FieldParseError {
    pub fn new(
        line: usize,
        column: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            line,
            column: column.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while writing the output CSV.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create or flush the output file.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to encode a record.
    #[error("Failed to write CSV record: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to encode the parameters object.
    #[error("Failed to encode parameters: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Migration Errors (top-level)
// =============================================================================

/// Top-level migration error.
///
/// This is the error returned by [`crate::transform::pipeline::migrate`].
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Input error.
    #[error("Read error: {0}")]
    Read(#[from] ReadError),

    /// Malformed JSON field.
    #[error("Parse error: {0}")]
    Parse(#[from] FieldParseError),

    /// Output error.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

impl MigrationError {
    /// True when the input resource is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Read(ReadError::NotFound { .. }))
    }

    /// True when the header row lacks a required column.
    pub fn is_missing_column(&self) -> bool {
        matches!(self, Self::Read(ReadError::MissingColumns(_)))
    }

    /// True when a jsonb-bound field failed to parse.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for input operations.
pub type ReadResult<T> = Result<T, ReadError>;

/// Result type for per-record transformation.
pub type ParseResult<T> = Result<T, FieldParseError>;

/// Result type for a whole migration run.
pub type MigrationResult<T> = Result<T, MigrationError>;
