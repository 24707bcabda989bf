//! Record shapes on both sides of the migration.
//!
//! - [`InputRecord`] - One row of the exported `configurations.csv`
//! - [`OutputRecord`] - One row of the Postgres-ready `configurations_pg.csv`
//! - [`Parameters`] - The object folded into the `parameters` jsonb column

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Column Names
// =============================================================================

/// Columns the input header must contain.
pub const INPUT_COLUMNS: [&str; 8] = [
    "id",
    "name",
    "workflowId",
    "description",
    "parameterOverrides",
    "exposedParameters",
    "parameterOrder",
    "inputModes",
];

/// Header row of the output, in emission order.
pub const OUTPUT_COLUMNS: [&str; 5] = ["id", "name", "workflow_id", "parameters", "inputmodes"];

/// Written to `inputmodes` when the input value is blank.
pub const EMPTY_INPUT_MODES: &str = "{}";

// =============================================================================
// Input Record
// =============================================================================

/// A configuration row as exported from the legacy store.
///
/// Columns are matched by header name. A field missing from a short row
/// deserializes to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputRecord {
    pub id: String,
    pub name: String,
    pub workflow_id: String,
    pub description: String,
    /// JSON object text, possibly empty.
    pub parameter_overrides: String,
    /// JSON object text, possibly empty.
    pub exposed_parameters: String,
    /// JSON array text, possibly empty.
    pub parameter_order: String,
    pub input_modes: String,
}

// =============================================================================
// Parameters
// =============================================================================

/// The structured object stored in the `parameters` jsonb column.
///
/// Field order is the serialization order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    pub description: String,
    pub parameter_overrides: Value,
    pub exposed_parameters: Value,
    pub parameter_order: Value,
}

// =============================================================================
// Output Record
// =============================================================================

/// A configuration row in the Postgres layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    pub id: String,
    pub name: String,
    pub workflow_id: String,
    /// Encoded [`Parameters`].
    pub parameters: String,
    pub inputmodes: String,
}

impl OutputRecord {
    /// Fields in [`OUTPUT_COLUMNS`] order.
    pub fn as_row(&self) -> [&str; 5] {
        [
            &self.id,
            &self.name,
            &self.workflow_id,
            &self.parameters,
            &self.inputmodes,
        ]
    }
}
