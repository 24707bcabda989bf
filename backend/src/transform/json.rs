//! Text encoding of the `parameters` jsonb value.
//!
//! Rows already loaded by the legacy export were encoded with `, ` / `: `
//! separators, ASCII-only output and Python-style float formatting. The
//! [`CanonicalFormatter`] reproduces that byte for byte so re-running the
//! migration never changes a stored value.
//!
//! ```rust,ignore
//! use serde_json::json;
//! use config_migrate::transform::json::to_canonical_string;
//!
//! let text = to_canonical_string(&json!({"a": [1, 2], "é": 1.0})).unwrap();
//! assert_eq!(text, r#"{"a": [1, 2], "\u00e9": 1.0}"#);
//! ```

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

/// serde_json formatter producing the canonical encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(float_repr(value).as_bytes())
    }

    /// Numbers parsed from input arrive here as their source text. Integers
    /// keep every digit, anything with a fraction or exponent is re-laid
    /// out as a float.
    fn write_number_str<W>(&mut self, writer: &mut W, value: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let digits = value.strip_prefix('-').unwrap_or(value);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            // -0 is plain 0 once read as an integer
            if digits.bytes().all(|b| b == b'0') {
                return writer.write_all(b"0");
            }
            return writer.write_all(value.as_bytes());
        }

        match value.parse::<f64>() {
            // Exponent overflow
            Ok(f) if f.is_infinite() => {
                let text: &[u8] = if f < 0.0 { b"-Infinity" } else { b"Infinity" };
                writer.write_all(text)
            }
            Ok(f) => writer.write_all(float_repr(f).as_bytes()),
            Err(_) => writer.write_all(value.as_bytes()),
        }
    }

    /// Non-ASCII characters and DEL become `\uXXXX` escapes (UTF-16 code units).
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() && ch != '\u{7f}' {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Encode a value with the [`CanonicalFormatter`].
pub fn to_canonical_string<T>(value: &T) -> serde_json::Result<String>
where
    T: ?Sized + Serialize,
{
    let mut buf = Vec::with_capacity(128);
    let mut ser = Serializer::with_formatter(&mut buf, CanonicalFormatter);
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(serde::ser::Error::custom)
}

/// Shortest round-trip representation of a finite float, laid out the way
/// Python's `repr` does: positional for exponents in `-4..16`, otherwise
/// scientific with a signed, at least two-digit exponent.
fn float_repr(value: f64) -> String {
    let sign = if value.is_sign_negative() { "-" } else { "" };

    // `{:e}` gives the shortest round-trip digits, e.g. "1.2345e2"
    let sci = format!("{:e}", value.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let body = if (-4..16).contains(&exp) {
        if exp >= 0 {
            let point = exp as usize + 1;
            if digits.len() <= point {
                format!("{}{}.0", digits, "0".repeat(point - digits.len()))
            } else {
                format!("{}.{}", &digits[..point], &digits[point..])
            }
        } else {
            format!("0.{}{}", "0".repeat((-exp - 1) as usize), digits)
        }
    } else {
        let mantissa = if digits.len() == 1 {
            digits.clone()
        } else {
            format!("{}.{}", &digits[..1], &digits[1..])
        };
        let exp_sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, exp_sign, exp.abs())
    };

    format!("{sign}{body}")
}
