//! Whole-run migration: read input, transform every row, write output.
//!
//! The run is sequential and fail-fast. The output file is only created
//! once the input exists and its header has every required column; a
//! malformed JSON field later on aborts the run and leaves the output
//! truncated at the last complete row.
//!
//! # Example
//!
//! ```rust,ignore
//! use config_migrate::{migrate, MigrationOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let summary = migrate(&MigrationOptions::default())?;
//!     println!("Migrated {} configurations", summary.stats.rows);
//!     Ok(())
//! }
//! ```

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use csv::{Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{MigrationResult, WriteError};
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::{INPUT_COLUMNS, OUTPUT_COLUMNS};
use crate::parser::{decode_input, read_input, RecordReader};

use super::row::{transform_record, Defaulted};

/// Input file read by the migration
pub const DEFAULT_INPUT_PATH: &str = "configurations.csv";

/// Output file written by the migration
pub const DEFAULT_OUTPUT_PATH: &str = "configurations_pg.csv";

/// Options for a migration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationOptions {
    /// Exported configurations CSV
    pub input_path: PathBuf,

    /// Postgres-ready CSV, created or truncated
    pub output_path: PathBuf,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

/// Row counters of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowStats {
    /// Rows written (equals rows read)
    pub rows: usize,
    pub parameter_overrides_defaulted: usize,
    pub exposed_parameters_defaulted: usize,
    pub parameter_order_defaulted: usize,
    /// Rows whose `inputmodes` became `{}`
    pub input_modes_defaulted: usize,
}

impl RowStats {
    fn record(&mut self, defaulted: Defaulted) {
        self.rows += 1;
        self.parameter_overrides_defaulted += usize::from(defaulted.parameter_overrides);
        self.exposed_parameters_defaulted += usize::from(defaulted.exposed_parameters);
        self.parameter_order_defaulted += usize::from(defaulted.parameter_order);
        self.input_modes_defaulted += usize::from(defaulted.input_modes);
    }
}

/// Result of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct MigrationSummary {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Detected input encoding
    pub encoding: String,
    pub stats: RowStats,
}

/// Migrate the input file to the output file.
///
/// This is the main entry point. It:
/// 1. Reads and decodes the input (encoding auto-detected)
/// 2. Checks the header for every required column
/// 3. Creates the output and writes its fixed header
/// 4. Transforms and writes each row in input order
pub fn migrate(options: &MigrationOptions) -> MigrationResult<MigrationSummary> {
    log_info(format!("📖 Reading {}", options.input_path.display()));
    let input = read_input(&options.input_path)?;
    log_success(format!("Detected encoding: {}", input.encoding));

    let records = input.records()?;
    log_success(format!("Header has all {} required columns", INPUT_COLUMNS.len()));

    log_info(format!("⚙️  Writing {}", options.output_path.display()));
    let file = File::create(&options.output_path).map_err(WriteError::from)?;
    let stats = write_records(records, file)?;

    print_stats(&stats);

    Ok(MigrationSummary {
        input_path: options.input_path.clone(),
        output_path: options.output_path.clone(),
        encoding: input.encoding,
        stats,
    })
}

/// Migrate raw CSV bytes in memory.
///
/// Same as [`migrate`] but without touching the filesystem.
pub fn migrate_bytes(bytes: &[u8]) -> MigrationResult<(Vec<u8>, RowStats)> {
    let input = decode_input(bytes)?;
    let records = input.records()?;

    let mut out = Vec::with_capacity(bytes.len());
    let stats = write_records(records, &mut out)?;
    Ok((out, stats))
}

/// Transform every record and write the output CSV to `out`.
///
/// The header row is written first, even when there are no records.
/// Records end with CRLF; fields are quoted only when they contain a comma,
/// a quote or a line break.
pub fn write_records<W: Write>(records: RecordReader<'_>, out: W) -> MigrationResult<RowStats> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(out);

    writer.write_record(OUTPUT_COLUMNS).map_err(WriteError::from)?;

    let mut stats = RowStats::default();
    for item in records {
        let (line, record) = item?;
        let row = transform_record(record, line)?;
        writer.write_record(row.record.as_row()).map_err(WriteError::from)?;
        stats.record(row.defaulted);
    }

    writer.flush().map_err(WriteError::from)?;
    Ok(stats)
}

/// Print row counters
fn print_stats(stats: &RowStats) {
    log_success(format!("Migrated {} configurations", stats.rows));
    if stats.rows == 0 {
        log_warning("Input has a header but no rows");
        return;
    }
    log_info_indent(format!("inputmodes defaulted to {{}}: {}", stats.input_modes_defaulted), 1);
    log_info_indent(
        format!("parameterOverrides defaulted to {{}}: {}", stats.parameter_overrides_defaulted),
        1,
    );
    log_info_indent(
        format!("exposedParameters defaulted to {{}}: {}", stats.exposed_parameters_defaulted),
        1,
    );
    log_info_indent(
        format!("parameterOrder defaulted to []: {}", stats.parameter_order_defaulted),
        1,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    const HEADER: &str =
        "id,name,workflowId,description,parameterOverrides,exposedParameters,parameterOrder,inputModes";

    fn run(csv: &str) -> (String, RowStats) {
        let (out, stats) = migrate_bytes(csv.as_bytes()).unwrap();
        (String::from_utf8(out).unwrap(), stats)
    }

    fn output_rows(text: &str) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new().from_reader(text.as_bytes());
        assert_eq!(reader.headers().unwrap(), &csv::StringRecord::from(OUTPUT_COLUMNS.to_vec()));
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    fn options_in(dir: &tempfile::TempDir) -> MigrationOptions {
        MigrationOptions {
            input_path: dir.path().join(DEFAULT_INPUT_PATH),
            output_path: dir.path().join(DEFAULT_OUTPUT_PATH),
        }
    }

    #[test]
    fn test_default_options() {
        let opts = MigrationOptions::default();
        assert_eq!(opts.input_path, PathBuf::from("configurations.csv"));
        assert_eq!(opts.output_path, PathBuf::from("configurations_pg.csv"));
    }

    #[test]
    fn test_reference_row_bytes() {
        let csv = format!("{HEADER}\n1,Foo,wf1,desc,\"{{\"\"a\"\":1}}\",{{}},\"[\"\"a\"\"]\",\n");
        let (text, stats) = run(&csv);

        assert_eq!(
            text,
            concat!(
                "id,name,workflow_id,parameters,inputmodes\r\n",
                "1,Foo,wf1,\"{\"\"description\"\": \"\"desc\"\", \"\"parameterOverrides\"\": {\"\"a\"\": 1}, ",
                "\"\"exposedParameters\"\": {}, \"\"parameterOrder\"\": [\"\"a\"\"]}\",{}\r\n",
            )
        );
        assert_eq!(stats.rows, 1);
        assert_eq!(stats.input_modes_defaulted, 1);
        assert_eq!(stats.parameter_overrides_defaulted, 0);
    }

    #[test]
    fn test_row_count_and_order_preserved() {
        let mut csv = format!("{HEADER}\n");
        for i in 0..25 {
            csv.push_str(&format!("{i},name-{i},wf-{},d{i},,,,\n", i % 3));
        }
        let (text, stats) = run(&csv);
        let rows = output_rows(&text);

        assert_eq!(stats.rows, 25);
        assert_eq!(rows.len(), 25);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row[0], i.to_string());
            assert_eq!(row[1], format!("name-{i}"));
            assert_eq!(row[2], format!("wf-{}", i % 3));
        }
    }

    #[test]
    fn test_fields_carried_through() {
        let csv = format!(
            "{HEADER}\nabc-123,\"Portrait, 4k\",wf_9,,,,,manual\n7,  spaced  ,wf,,,,,   \n"
        );
        let (text, _) = run(&csv);
        let rows = output_rows(&text);

        assert_eq!(rows[0][0], "abc-123");
        assert_eq!(rows[0][1], "Portrait, 4k");
        assert_eq!(rows[0][2], "wf_9");
        assert_eq!(rows[0][4], "manual");
        assert_eq!(rows[1][1], "  spaced  ");
        assert_eq!(rows[1][4], "{}");
    }

    #[test]
    fn test_empty_json_fields_decode_to_defaults() {
        let csv = format!("{HEADER}\n1,Foo,wf1,my description,,,,\n");
        let (text, stats) = run(&csv);
        let rows = output_rows(&text);
        let params: Value = serde_json::from_str(&rows[0][3]).unwrap();

        assert_eq!(
            params,
            json!({
                "description": "my description",
                "parameterOverrides": {},
                "exposedParameters": {},
                "parameterOrder": []
            })
        );
        assert_eq!(stats.parameter_order_defaulted, 1);
        assert_eq!(stats.exposed_parameters_defaulted, 1);
    }

    #[test]
    fn test_header_only_input() {
        let (text, stats) = run(&format!("{HEADER}\n"));

        assert_eq!(text, "id,name,workflow_id,parameters,inputmodes\r\n");
        assert_eq!(stats, RowStats::default());
    }

    #[test]
    fn test_malformed_json_aborts() {
        let csv = format!("{HEADER}\n1,a,w,,,,,\n2,b,w,,{{bad json,,,\n3,c,w,,,,,\n");
        let err = migrate_bytes(csv.as_bytes()).unwrap_err();

        assert!(err.is_parse_error());
        assert!(err.to_string().contains("Line 3"));
        assert!(err.to_string().contains("parameterOverrides"));
    }

    #[test]
    fn test_missing_column_aborts() {
        let csv = "id,name,workflowId,description,parameterOverrides,exposedParameters,parameterOrder\n1,a,w,,,,\n";
        let err = migrate_bytes(csv.as_bytes()).unwrap_err();

        assert!(err.is_missing_column());
        assert!(err.to_string().contains("inputModes"));
    }

    #[test]
    fn test_migrate_file_round() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options_in(&dir);
        std::fs::write(
            &opts.input_path,
            format!("{HEADER}\n1,Foo,wf1,desc,,,,manual\n2,Bar,wf2,,,,,\n"),
        )
        .unwrap();

        let summary = migrate(&opts).unwrap();
        assert_eq!(summary.stats.rows, 2);
        assert_eq!(summary.encoding, "utf-8");

        let text = std::fs::read_to_string(&opts.output_path).unwrap();
        let rows = output_rows(&text);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][4], "manual");
        assert_eq!(rows[1][4], "{}");
    }

    #[test]
    fn test_missing_input_creates_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options_in(&dir);

        let err = migrate(&opts).unwrap_err();
        assert!(err.is_not_found());
        assert!(!opts.output_path.exists());
    }

    #[test]
    fn test_missing_column_creates_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options_in(&dir);
        std::fs::write(&opts.input_path, "id,name,workflowId\n1,a,w\n").unwrap();

        let err = migrate(&opts).unwrap_err();
        assert!(err.is_missing_column());
        assert!(!opts.output_path.exists());
    }

    #[test]
    fn test_latin1_input() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options_in(&dir);
        let csv = format!(
            "{HEADER}\n1,Café crème,wf1,Réglages détaillés pour générer des images de très haute qualité,,,,\n"
        );
        let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(&csv);
        assert!(std::str::from_utf8(&bytes).is_err());
        std::fs::write(&opts.input_path, &bytes).unwrap();

        let summary = migrate(&opts).unwrap();

        let text = std::fs::read_to_string(&opts.output_path).unwrap();
        let rows = output_rows(&text);
        assert_eq!(summary.stats.rows, 1);
        assert_eq!(rows[0][1], "Café crème");
        assert_eq!(rows[0][2], "wf1");
        assert!(rows[0][3].starts_with(r#"{"description": "R\u00e9glages d\u00e9taill\u00e9s pour"#));
    }

    #[test]
    fn test_non_ascii_plain_columns_stay_raw() {
        let (text, _) = run(&format!("{HEADER}\nsoc-é,Société ✓,wf-ü,Société,,,,\n"));

        let rows = output_rows(&text);
        assert_eq!(rows[0][0], "soc-é");
        assert_eq!(rows[0][1], "Société ✓");
        assert_eq!(rows[0][2], "wf-ü");
        assert_eq!(
            rows[0][3],
            r#"{"description": "Soci\u00e9t\u00e9", "parameterOverrides": {}, "exposedParameters": {}, "parameterOrder": []}"#
        );
        assert!(text.contains("soc-é,Société ✓,wf-ü,"));
    }
}
