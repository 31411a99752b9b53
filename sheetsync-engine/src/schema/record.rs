use std::marker::PhantomData;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use sheetsync_core::FieldKind;
use sheetsync_ir::RawRow;

use super::{FieldDescriptor, Schema, SchemaOps};
use crate::{
    ConvertError, FieldAccess, Result,
    coerce::{coerce_row, to_json},
};

/// A Rust type sheets can convert into.
///
/// Records are plain serde types. Fields are matched to columns by their
/// serialized names and every field the source leaves out keeps its
/// `Default` value.
pub trait Record:
    FieldAccess + Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static
{
    /// Full type path (e.g., "items.Weapon"). The last segment is the name
    /// conversion entries refer to.
    const TYPE_PATH: &'static str;
}

/// A record that supports one artifact per row.
pub trait LineRecord: Record {
    /// Post-load hook, called after a row has been written onto the record.
    ///
    /// Returning an error skips the row.
    fn process(&mut self) -> eyre::Result<()> {
        Ok(())
    }
}

type Hook<T> = fn(&mut T) -> eyre::Result<()>;

/// [`SchemaOps`] for a Rust record type.
pub struct RecordSchema<T> {
    hook: Option<Hook<T>>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> RecordSchema<T> {
    /// Operations without the per-row capability.
    pub fn plain() -> Self {
        Self {
            hook: None,
            _record: PhantomData,
        }
    }

    /// Operations with the per-row capability and its post-load hook.
    pub fn line() -> Self
    where
        T: LineRecord,
    {
        Self {
            hook: Some(<T as LineRecord>::process),
            _record: PhantomData,
        }
    }

    /// Field descriptors, derived from the serialized default record.
    pub fn descriptors() -> Vec<FieldDescriptor> {
        match serde_json::to_value(T::default()) {
            Ok(Value::Object(fields)) => fields
                .iter()
                .map(|(name, value)| FieldDescriptor::new(name, FieldKind::of_value(value)))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn into_schema(self) -> Schema {
        let line = self.hook.is_some();
        Schema::new(T::TYPE_PATH, Self::descriptors(), line, self)
    }

    fn decode(&self, record: Value) -> Result<T> {
        let base = to_json(&T::default(), T::TYPE_PATH)?;
        let merged = match (base, record) {
            (Value::Object(mut fields), Value::Object(values)) => {
                for (name, value) in values {
                    if let Some(slot) = fields.get_mut(&name) {
                        *slot = value;
                    }
                }
                Value::Object(fields)
            }
            (_, record) => record,
        };

        serde_json::from_value(merged).map_err(|e| ConvertError::coerce(T::TYPE_PATH, "record", e))
    }
}

impl<T: Record> SchemaOps for RecordSchema<T> {
    fn coerce(&self, row: &RawRow) -> Result<Value> {
        let record: T = coerce_row(row)?;
        to_json(&record, T::TYPE_PATH)
    }

    fn normalize(&self, record: Value) -> Result<Value> {
        let record = self.decode(record)?;
        to_json(&record, T::TYPE_PATH)
    }

    fn process(&self, record: Value) -> Result<Value> {
        let Some(hook) = self.hook else {
            return Ok(record);
        };

        let mut record = self.decode(record)?;
        hook(&mut record).map_err(|e| ConvertError::Process {
            schema: T::TYPE_PATH.to_string(),
            message: e.to_string(),
        })?;
        to_json(&record, T::TYPE_PATH)
    }
}
