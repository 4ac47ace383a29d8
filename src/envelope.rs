//! Lazily decodes only the `type` tag and
//! hands back the raw field map for further extraction. A line that
//! isn't a JSON object is simply unreadable as an event — `None` tells
//! the caller to skip the line rather than abort the fold.

use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct Envelope {
    pub type_: String,
    pub fields: Map<String, Value>,
}

pub fn parse_envelope(line: &str) -> Option<Envelope> {
    let value: Value = serde_json::from_str(line).ok()?;
    let fields = value.as_object()?.clone();
    let type_ = fields
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some(Envelope { type_, fields })
}

/// Extracts a string field, tolerating a present-but-wrong-type value by
/// treating it as absent rather than failing the whole line.
pub fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}

pub fn i64_field(fields: &Map<String, Value>, key: &str) -> Option<i64> {
    fields.get(key).and_then(Value::as_i64)
}

pub fn bool_field(fields: &Map<String, Value>, key: &str) -> Option<bool> {
    fields.get(key).and_then(Value::as_bool)
}

pub fn string_vec_field(fields: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let arr = fields.get(key)?.as_array()?;
    Some(
        arr.iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}
