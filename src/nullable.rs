//! Three-valued nullability: every optional field on a
//! mutation record distinguishes absent (no change), explicit JSON
//! `null` (clear), and a present value (overwrite). Typed `Option<T>`
//! can't carry this distinction on its own, so mutation fields are
//! probed against the raw field map first.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Field<T> {
    /// Applies the three-valued semantics to a target `Option<T>` in
    /// place: absent leaves it untouched, null clears it, a value
    /// overwrites it.
    pub fn apply(self, target: &mut Option<T>) {
        match self {
            Field::Absent => {}
            Field::Null => *target = None,
            Field::Value(v) => *target = Some(v),
        }
    }
}

/// Probes a field for presence/null/value. A value present but of the
/// wrong shape is treated as absent (skip this field) rather than
/// failing the whole record — structural corruption is scoped to the
/// field, not the line, once the envelope itself parsed.
pub fn probe<T: DeserializeOwned>(fields: &Map<String, Value>, key: &str) -> Field<T> {
    match fields.get(key) {
        None => Field::Absent,
        Some(Value::Null) => Field::Null,
        Some(v) => match serde_json::from_value(v.clone()) {
            Ok(t) => Field::Value(t),
            Err(_) => Field::Absent,
        },
    }
}
