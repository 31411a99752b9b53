//! Raw value to typed value conversion.

use std::any::{Any, TypeId, type_name};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use sheetsync_ir::{RawRow, RawValue};

use crate::{ConvertError, Result};

/// Convert a raw value into `T`.
///
/// Tried in order:
/// 1. passthrough, when the raw value already holds a `T` (`RawValue`
///    itself, `String`, `i64`, `f64` or `bool`);
/// 2. stringification, when `T` is `String`;
/// 3. a JSON round-trip. When that fails on a string value, the string's
///    text is parsed as JSON instead, so `"5"` converts into `5`.
pub fn coerce<T>(raw: &RawValue) -> Result<T>
where
    T: DeserializeOwned + Clone + 'static,
{
    if let Some(value) = passthrough::<T>(raw) {
        return Ok(value);
    }

    if TypeId::of::<T>() == TypeId::of::<String>() {
        let text: Box<dyn Any> = Box::new(raw.to_string());
        if let Ok(text) = text.downcast::<T>() {
            return Ok(*text);
        }
    }

    match serde_json::from_value::<T>(raw.to_json()) {
        Ok(value) => Ok(value),
        Err(strict) => {
            if let RawValue::String(text) = raw {
                if let Ok(value) = serde_json::from_str::<T>(text.trim()) {
                    return Ok(value);
                }
            }
            Err(ConvertError::coerce(type_name::<T>(), raw.kind_name(), strict))
        }
    }
}

fn passthrough<T: Clone + 'static>(raw: &RawValue) -> Option<T> {
    if let Some(value) = (raw as &dyn Any).downcast_ref::<T>() {
        return Some(value.clone());
    }

    let inner: &dyn Any = match raw {
        RawValue::Bool(b) => b,
        RawValue::Int(i) => i,
        RawValue::Float(f) => f,
        RawValue::String(s) => s,
        RawValue::Null | RawValue::List(_) | RawValue::Row(_) => return None,
    };
    inner.downcast_ref::<T>().cloned()
}

/// Convert one field of a row.
///
/// Returns `None` when the row has no such field or the cell is empty.
/// Errors name the field.
pub fn coerce_field<T>(row: &RawRow, name: &str) -> Result<Option<T>>
where
    T: DeserializeOwned + Clone + 'static,
{
    match row.get(name) {
        None | Some(RawValue::Null) => Ok(None),
        Some(raw) => coerce::<T>(raw).map(Some).map_err(|e| e.in_field(name)),
    }
}

/// Convert a whole row into a record.
///
/// Fields are matched by name, case-sensitively. Columns the record does not
/// have are ignored, and fields the row does not set (or leaves empty) keep
/// their `Default` value.
pub fn coerce_row<T>(row: &RawRow) -> Result<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    let target = type_name::<T>();
    let mut base = to_json(&T::default(), target)?;

    match base.as_object_mut() {
        Some(fields) => {
            for (name, raw) in row {
                if matches!(raw, RawValue::Null) {
                    continue;
                }
                if let Some(slot) = fields.get_mut(name) {
                    *slot = field_json(slot, raw);
                }
            }
        }
        None => base = row.to_json(),
    }

    serde_json::from_value(base).map_err(|e| ConvertError::coerce(target, "row", e))
}

/// JSON form of a cell for a record field whose default is `slot`.
///
/// Numeric and boolean fields accept their value written as text, and text
/// fields take scalars in their string form.
fn field_json(slot: &Value, raw: &RawValue) -> Value {
    match (slot, raw) {
        (Value::Number(_) | Value::Bool(_), RawValue::String(text)) => {
            match serde_json::from_str::<Value>(text.trim()) {
                Ok(parsed @ (Value::Number(_) | Value::Bool(_))) => parsed,
                _ => raw.to_json(),
            }
        }
        (Value::String(_), RawValue::Int(_) | RawValue::Float(_) | RawValue::Bool(_)) => {
            Value::String(raw.to_string())
        }
        _ => raw.to_json(),
    }
}

/// Serialize a record into its JSON form.
pub(crate) fn to_json<T: Serialize>(record: &T, target: &str) -> Result<Value> {
    serde_json::to_value(record).map_err(|e| ConvertError::Coerce {
        target: target.to_string(),
        found: "record",
        message: e.to_string(),
    })
}
