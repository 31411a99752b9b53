//! Field kinds of declared record schemas.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Supported field kinds in declared schemas.
///
/// This is a host-independent description of a record field's type, used by
/// schemas declared in `sheetsync.toml` and by the field descriptors derived
/// from Rust record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Int,
    Float,
    Bool,
    /// Any JSON-compatible value (lists, nested rows, mixed).
    Any,
}

impl FieldKind {
    /// All kinds, in declaration order.
    pub const ALL: [FieldKind; 5] = [
        FieldKind::String,
        FieldKind::Int,
        FieldKind::Float,
        FieldKind::Bool,
        FieldKind::Any,
    ];

    /// Get the kind name (used in sheetsync.toml)
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::Bool => "bool",
            FieldKind::Any => "any",
        }
    }

    /// Value a field of this kind holds when the source row does not set it.
    pub fn default_value(&self) -> Value {
        match self {
            FieldKind::String => Value::String(String::new()),
            FieldKind::Int => Value::from(0),
            FieldKind::Float => Value::from(0.0),
            FieldKind::Bool => Value::Bool(false),
            FieldKind::Any => Value::Null,
        }
    }

    /// Infer the kind of a serialized field value.
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::String(_) => FieldKind::String,
            Value::Number(n) if n.is_i64() || n.is_u64() => FieldKind::Int,
            Value::Number(_) => FieldKind::Float,
            Value::Bool(_) => FieldKind::Bool,
            Value::Null | Value::Array(_) | Value::Object(_) => FieldKind::Any,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" | "str" => Ok(FieldKind::String),
            "int" | "integer" => Ok(FieldKind::Int),
            "float" | "number" => Ok(FieldKind::Float),
            "bool" | "boolean" => Ok(FieldKind::Bool),
            "any" => Ok(FieldKind::Any),
            _ => Err(format!(
                "unknown field kind '{}', expected one of: string, int, float, bool, any",
                s
            )),
        }
    }
}

/// Accepts the same names and aliases as [`FromStr`].
impl<'de> Deserialize<'de> for FieldKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
