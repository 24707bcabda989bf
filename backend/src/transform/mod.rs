//! Transformation module.
//!
//! This module handles the configuration row migration:
//! - Json: canonical encoding of the `parameters` value
//! - Row: per-record mapping
//! - Pipeline: file-to-file run

pub mod json;
pub mod pipeline;
pub mod row;

pub use json::{to_canonical_string, CanonicalFormatter};
pub use pipeline::*;
pub use row::{
    build_parameters, normalize_input_modes, parse_json_field, transform_record, Defaulted,
    TransformedRow,
};
