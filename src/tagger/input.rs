use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::{Number, Value};

use crate::models::RawInput;

/// Integral floats at or above this magnitude keep exponent notation.
const EXPONENT_THRESHOLD: f64 = 1e21;

/// Converts caller input into the single string the prompt is built from.
///
/// Never fails: structured values that cannot be pretty-printed fall back to
/// their compact form, and scalars use their canonical text.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tagsmith::RawInput;
/// use tagsmith::tagger::normalize_input;
///
/// assert_eq!(normalize_input(&RawInput::from("plain text")), "plain text");
/// assert_eq!(normalize_input(&RawInput::from(json!({"a": 1}))), "{\n  \"a\": 1\n}");
/// assert_eq!(normalize_input(&RawInput::from(json!(null))), "null");
/// assert_eq!(normalize_input(&RawInput::from(json!(3.0))), "3");
/// assert_eq!(normalize_input(&RawInput::from(json!([3.0]))), "[\n  3\n]");
/// ```
pub fn normalize_input(input: &RawInput) -> String {
    match input {
        RawInput::Text(text) => text.clone(),
        RawInput::Structured(value) => pretty_print(value).unwrap_or_else(|| value.to_string()),
        RawInput::Other(value) => scalar_to_string(value),
    }
}

fn pretty_print(value: &Value) -> Option<String> {
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, PromptFormatter::new());
    value.serialize(&mut serializer).ok()?;
    String::from_utf8(out).ok()
}

/// Two-space pretty printing that writes numbers the same way top-level
/// scalars are written.
struct PromptFormatter {
    pretty: PrettyFormatter<'static>,
}

impl PromptFormatter {
    fn new() -> Self {
        Self {
            pretty: PrettyFormatter::new(),
        }
    }
}

impl Formatter for PromptFormatter {
    fn write_f64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        match integral_float_text(value) {
            Some(text) => writer.write_all(text.as_bytes()),
            None => self.pretty.write_f64(writer, value),
        }
    }

    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number_to_string(number),
        other => other.to_string(),
    }
}

/// Prints integral floats without a trailing `.0`, so `2.0` and `2` read the
/// same in the prompt.
fn number_to_string(number: &Number) -> String {
    match number.as_f64() {
        Some(f) if !number.is_i64() && !number.is_u64() => {
            integral_float_text(f).unwrap_or_else(|| number.to_string())
        }
        _ => number.to_string(),
    }
}

fn integral_float_text(f: f64) -> Option<String> {
    if f == 0.0 {
        Some("0".to_string())
    } else if f.fract() == 0.0 && f.abs() < EXPONENT_THRESHOLD {
        Some(format!("{f:.0}"))
    } else {
        None
    }
}
