//! Input CSV reading with encoding auto-detection.
//!
//! The whole file is read and decoded up front, then rows are deserialized
//! one at a time into [`InputRecord`]s. The header row is checked against
//! [`INPUT_COLUMNS`] before any row is handed out.

use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::{ReadError, ReadResult};
use crate::models::{InputRecord, INPUT_COLUMNS};

/// Decoded input with its detection metadata.
#[derive(Debug, Clone)]
pub struct InputSource {
    /// Decoded file content
    pub content: String,
    /// Detected encoding
    pub encoding: String,
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 (with or without BOM) always wins; anything else is left to chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "iso-8859-15" | "latin-9" => "iso-8859-15".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the specified encoding.
///
/// Labels resolve through the WHATWG label table, so `iso-8859-1` and
/// `latin1` decode as windows-1252. A leading UTF-8 BOM is dropped.
/// Unknown labels and undecodable sequences are errors.
pub fn decode_content(bytes: &[u8], encoding: &str) -> ReadResult<String> {
    let decoder = encoding_rs::Encoding::for_label(encoding.trim().as_bytes())
        .ok_or_else(|| ReadError::UnsupportedEncoding(encoding.to_string()))?;

    let (content, used, had_errors) = decoder.decode(bytes);
    if had_errors {
        return Err(ReadError::Malformed(used.name().to_string()));
    }
    Ok(content.into_owned())
}

/// Read and decode the input file.
pub fn read_input<P: AsRef<Path>>(path: P) -> ReadResult<InputSource> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ReadError::NotFound { path: path.to_path_buf() },
        _ => ReadError::Io(e),
    })?;

    decode_input(&bytes)
}

/// Decode raw input bytes with auto-detection.
pub fn decode_input(bytes: &[u8]) -> ReadResult<InputSource> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    Ok(InputSource { content, encoding })
}

/// Check that every required column is in the header row.
///
/// All missing columns are reported together, in [`INPUT_COLUMNS`] order.
pub fn check_headers(headers: &StringRecord) -> ReadResult<()> {
    if headers.is_empty() {
        return Err(ReadError::EmptyFile);
    }

    let missing: Vec<String> = INPUT_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ReadError::MissingColumns(missing))
    }
}

impl InputSource {
    /// Open a header-checked record reader over the decoded content.
    pub fn records(&self) -> ReadResult<RecordReader<'_>> {
        RecordReader::new(self.content.as_bytes())
    }
}

/// Iterator over the data rows of an input CSV.
///
/// Yields `(line, record)` where `line` is the 1-based line the reader was on
/// when the row started (the header is line 1). Blank lines are skipped,
/// short rows are padded with empty fields.
pub struct RecordReader<'a> {
    inner: csv::Reader<&'a [u8]>,
    headers: StringRecord,
    row: StringRecord,
}

impl<'a> RecordReader<'a> {
    pub fn new(data: &'a [u8]) -> ReadResult<Self> {
        let mut inner = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(data);

        let headers = inner.headers()?.clone();
        check_headers(&headers)?;

        Ok(Self {
            inner,
            headers,
            row: StringRecord::new(),
        })
    }

    /// The header row as read from the input.
    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }
}

impl Iterator for RecordReader<'_> {
    type Item = ReadResult<(usize, InputRecord)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.read_record(&mut self.row) {
            Ok(true) => {
                let line = self.row.position().map(|p| p.line() as usize).unwrap_or(0);
                // The deserializer walks the headers and needs a field for each one
                while self.row.len() < self.headers.len() {
                    self.row.push_field("");
                }
                let record = self
                    .row
                    .deserialize::<InputRecord>(Some(&self.headers))
                    .map(|r| (line, r))
                    .map_err(ReadError::from);
                Some(record)
            }
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}
