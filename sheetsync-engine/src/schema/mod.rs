//! Record schemas.
//!
//! A [`Schema`] describes one record type that sheets can convert into:
//! its full type path, its field descriptors, whether it supports one
//! artifact per row, and the type-erased operations that turn raw rows into
//! serialized records.
//!
//! Schemas come from two places:
//! - [`RecordSchema`] wraps a Rust type implementing [`Record`] (or
//!   [`LineRecord`] for the per-row capability)
//! - [`DeclaredSchema`] is built from a `[schemas."<path>"]` table in
//!   `sheetsync.toml`

mod declared;
mod record;

use std::fmt;

pub use declared::DeclaredSchema;
pub use record::{LineRecord, Record, RecordSchema};
use serde_json::Value;
use sheetsync_core::{FieldKind, simple_name};
use sheetsync_ir::RawRow;

use crate::Result;

/// Name and kind of one record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Type-erased record operations.
///
/// Records travel through the engine in their serialized JSON form. These
/// operations convert into that form and keep it valid for the schema.
pub trait SchemaOps: Send + Sync {
    /// Convert a raw row into a serialized record.
    fn coerce(&self, row: &RawRow) -> Result<Value>;

    /// Re-validate a serialized record, filling in defaults for missing fields.
    fn normalize(&self, record: Value) -> Result<Value>;

    /// Run the post-load hook on a serialized record.
    ///
    /// Schemas without a hook return the record unchanged.
    fn process(&self, record: Value) -> Result<Value>;
}

/// A registered record schema.
pub struct Schema {
    path: String,
    fields: Vec<FieldDescriptor>,
    line: bool,
    ops: Box<dyn SchemaOps>,
}

impl Schema {
    pub fn new(
        path: impl Into<String>,
        fields: Vec<FieldDescriptor>,
        line: bool,
        ops: impl SchemaOps + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            fields,
            line,
            ops: Box::new(ops),
        }
    }

    /// Schema of a Rust record type.
    pub fn of<T: Record>() -> Self {
        RecordSchema::<T>::plain().into_schema()
    }

    /// Schema of a Rust record type that supports one artifact per row.
    pub fn line<T: LineRecord>() -> Self {
        RecordSchema::<T>::line().into_schema()
    }

    /// Full type path (e.g., "items.Weapon").
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Simple name: the last segment of the path.
    pub fn name(&self) -> &str {
        simple_name(&self.path)
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Whether records of this schema can be generated one artifact per row.
    pub fn is_line(&self) -> bool {
        self.line
    }

    pub fn coerce(&self, row: &RawRow) -> Result<Value> {
        self.ops.coerce(row)
    }

    pub fn normalize(&self, record: Value) -> Result<Value> {
        self.ops.normalize(record)
    }

    pub fn process(&self, record: Value) -> Result<Value> {
        self.ops.process(record)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("path", &self.path)
            .field("fields", &self.fields)
            .field("line", &self.line)
            .finish_non_exhaustive()
    }
}
