//! Raw cell values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::RawRow;

/// A single raw value produced by the spreadsheet parser.
///
/// Values are either scalars, strings, lists or nested rows. Nested rows are
/// how the parser expresses grouped columns (`stats.hp`, `stats.mp`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Empty cell.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<RawValue>),
    Row(RawRow),
}

impl RawValue {
    /// Returns true for values that terminate a key path (strings and scalars).
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            RawValue::Bool(_) | RawValue::Int(_) | RawValue::Float(_) | RawValue::String(_)
        )
    }

    /// Returns the nested row if this value is one.
    pub fn as_row(&self) -> Option<&RawRow> {
        match self {
            RawValue::Row(row) => Some(row),
            _ => None,
        }
    }

    /// Returns the string content if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Text of a scalar value, `None` for null, lists and rows.
    pub fn scalar_text(&self) -> Option<String> {
        if self.is_scalar() {
            Some(self.to_string())
        } else {
            None
        }
    }

    /// Short name of the value's shape, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Bool(_) => "bool",
            RawValue::Int(_) => "int",
            RawValue::Float(_) => "float",
            RawValue::String(_) => "string",
            RawValue::List(_) => "list",
            RawValue::Row(_) => "row",
        }
    }

    /// Convert into a JSON value.
    ///
    /// Non-finite floats have no JSON form and become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            RawValue::Null => Value::Null,
            RawValue::Bool(b) => Value::Bool(*b),
            RawValue::Int(i) => Value::from(*i),
            RawValue::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
            RawValue::String(s) => Value::String(s.clone()),
            RawValue::List(items) => Value::Array(items.iter().map(RawValue::to_json).collect()),
            RawValue::Row(row) => row.to_json(),
        }
    }
}

/// Strings print verbatim, `null` prints as an empty string and lists/rows
/// print as compact JSON.
impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => Ok(()),
            RawValue::Bool(b) => write!(f, "{}", b),
            RawValue::Int(i) => write!(f, "{}", i),
            RawValue::Float(v) => write!(f, "{}", v),
            RawValue::String(s) => f.write_str(s),
            RawValue::List(_) | RawValue::Row(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::String(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Int(value.into())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<RawRow> for RawValue {
    fn from(value: RawRow) -> Self {
        RawValue::Row(value)
    }
}
