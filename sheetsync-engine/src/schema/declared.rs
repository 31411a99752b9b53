use indexmap::IndexMap;
use serde_json::{Map, Value};
use sheetsync_core::FieldKind;
use sheetsync_ir::{RawRow, RawValue};
use sheetsync_manifest::SchemaDecl;

use super::{FieldDescriptor, Schema, SchemaOps};
use crate::{ConvertError, Result, coerce::coerce_field};

/// A schema declared in `sheetsync.toml`.
///
/// Records are JSON objects holding exactly the declared fields. The
/// post-load hook rejects records whose `required` fields are empty.
#[derive(Debug, Clone)]
pub struct DeclaredSchema {
    path: String,
    fields: IndexMap<String, FieldKind>,
    required: Vec<String>,
}

impl DeclaredSchema {
    pub fn new(path: impl Into<String>, decl: &SchemaDecl) -> Self {
        Self {
            path: path.into(),
            fields: decl.fields.clone(),
            required: decl.required.clone(),
        }
    }

    pub fn into_schema(self, line: bool) -> Schema {
        let fields = self
            .fields
            .iter()
            .map(|(name, kind)| FieldDescriptor::new(name, *kind))
            .collect();
        Schema::new(self.path.clone(), fields, line, self)
    }

    fn build(&self, row: &RawRow) -> Result<Value> {
        let mut record = Map::new();
        for (name, kind) in &self.fields {
            let value = field_value(row, name, *kind)?.unwrap_or_else(|| kind.default_value());
            record.insert(name.clone(), value);
        }
        Ok(Value::Object(record))
    }
}

fn field_value(row: &RawRow, name: &str, kind: FieldKind) -> Result<Option<Value>> {
    Ok(match kind {
        FieldKind::String => coerce_field::<String>(row, name)?.map(Value::String),
        FieldKind::Int => coerce_field::<i64>(row, name)?.map(Value::from),
        FieldKind::Float => coerce_field::<f64>(row, name)?.map(Value::from),
        FieldKind::Bool => coerce_field::<bool>(row, name)?.map(Value::Bool),
        FieldKind::Any => row
            .get(name)
            .filter(|raw| !matches!(raw, RawValue::Null))
            .map(RawValue::to_json),
    })
}

fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

impl SchemaOps for DeclaredSchema {
    fn coerce(&self, row: &RawRow) -> Result<Value> {
        self.build(row)
    }

    fn normalize(&self, record: Value) -> Result<Value> {
        let Value::Object(mut values) = record else {
            return Err(ConvertError::coerce(&self.path, "record", "expected an object"));
        };
        let row: RawRow = self
            .fields
            .keys()
            .filter_map(|name| {
                let raw: RawValue = serde_json::from_value(values.remove(name)?).ok()?;
                Some((name.clone(), raw))
            })
            .collect();
        self.build(&row)
    }

    fn process(&self, record: Value) -> Result<Value> {
        for field in &self.required {
            if is_empty(record.get(field)) {
                return Err(ConvertError::Process {
                    schema: self.path.clone(),
                    message: format!("required field '{}' is empty", field),
                });
            }
        }
        Ok(record)
    }
}
