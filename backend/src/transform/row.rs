//! Per-record transformation.
//!
//! Maps one [`InputRecord`] to one [`OutputRecord`]:
//! - `parameterOverrides`, `exposedParameters` and `parameterOrder` are parsed
//!   and folded, with `description`, into the `parameters` object
//! - `workflowId` is renamed to `workflow_id`
//! - a blank `inputModes` becomes `{}`

use serde_json::{Map, Value};

use crate::error::{FieldParseError, MigrationResult, ParseResult, WriteError};
use crate::models::{InputRecord, OutputRecord, Parameters, EMPTY_INPUT_MODES};

use super::json::to_canonical_string;

/// Which fields of a row fell back to their empty default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Defaulted {
    pub parameter_overrides: bool,
    pub exposed_parameters: bool,
    pub parameter_order: bool,
    pub input_modes: bool,
}

/// A transformed row with its defaulting flags.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedRow {
    pub record: OutputRecord,
    pub defaulted: Defaulted,
}

/// Parse a jsonb-bound field.
///
/// Only the empty string takes `default`; whitespace is handed to the parser
/// and fails like any other malformed text.
pub fn parse_json_field(
    text: &str,
    default: Value,
    line: usize,
    column: &str,
) -> ParseResult<Value> {
    if text.is_empty() {
        return Ok(default);
    }

    serde_json::from_str(text)
        .map_err(|e| FieldParseError::new(line, column, text, e.to_string()))
}

/// Keep `inputModes` verbatim unless it is blank.
pub fn normalize_input_modes(value: &str) -> String {
    if value.trim().is_empty() {
        EMPTY_INPUT_MODES.to_string()
    } else {
        value.to_string()
    }
}

/// Build the `parameters` object of a row.
pub fn build_parameters(record: &InputRecord, line: usize) -> ParseResult<Parameters> {
    Ok(Parameters {
        description: record.description.clone(),
        parameter_overrides: parse_json_field(
            &record.parameter_overrides,
            Value::Object(Map::new()),
            line,
            "parameterOverrides",
        )?,
        exposed_parameters: parse_json_field(
            &record.exposed_parameters,
            Value::Object(Map::new()),
            line,
            "exposedParameters",
        )?,
        parameter_order: parse_json_field(
            &record.parameter_order,
            Value::Array(Vec::new()),
            line,
            "parameterOrder",
        )?,
    })
}

/// Transform one input row.
///
/// `line` is only used for error context.
pub fn transform_record(record: InputRecord, line: usize) -> MigrationResult<TransformedRow> {
    let parameters = build_parameters(&record, line)?;
    let encoded = to_canonical_string(&parameters).map_err(WriteError::from)?;

    let defaulted = Defaulted {
        parameter_overrides: record.parameter_overrides.is_empty(),
        exposed_parameters: record.exposed_parameters.is_empty(),
        parameter_order: record.parameter_order.is_empty(),
        input_modes: record.input_modes.trim().is_empty(),
    };

    let InputRecord { id, name, workflow_id, input_modes, .. } = record;

    Ok(TransformedRow {
        record: OutputRecord {
            id,
            name,
            workflow_id,
            parameters: encoded,
            inputmodes: normalize_input_modes(&input_modes),
        },
        defaulted,
    })
}
