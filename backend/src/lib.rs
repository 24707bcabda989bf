//! # Config-migrate - workflow configurations to the Postgres jsonb layout
//!
//! Rewrites the exported `configurations.csv` into `configurations_pg.csv`,
//! ready for `COPY` into a table whose `parameters` and `inputmodes`
//! columns are `jsonb`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Transform  │────▶│   PG CSV    │
//! │  (ISO/UTF8) │     │ (header chk)│     │ (per row)   │     │ (jsonb cols)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use config_migrate::{migrate, MigrationOptions};
//!
//! let summary = migrate(&MigrationOptions::default()).unwrap();
//! println!("Migrated {} configurations", summary.stats.rows);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error hierarchy
//! - [`models`] - Input/output record shapes
//! - [`parser`] - CSV reading with encoding detection
//! - [`transform`] - Canonical JSON, row mapping, and pipeline
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    FieldParseError,
    MigrationError,
    MigrationResult,
    ReadError,
    WriteError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    InputRecord,
    OutputRecord,
    Parameters,
    INPUT_COLUMNS,
    OUTPUT_COLUMNS,
};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    check_headers,
    decode_content,
    detect_encoding,
    read_input,
    InputSource,
    RecordReader,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{
    migrate,
    migrate_bytes,
    to_canonical_string,
    transform_record,
    write_records,
    MigrationOptions,
    MigrationSummary,
    RowStats,
};
