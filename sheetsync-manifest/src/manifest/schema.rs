use indexmap::IndexMap;
use serde::Deserialize;
use sheetsync_core::FieldKind;

/// A record schema declared in `[schemas."<path>"]`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDecl {
    /// Whether records of this schema can be generated one artifact per row.
    #[serde(default)]
    pub line: bool,

    /// Fields that must hold a non-empty value after a row is loaded.
    #[serde(default)]
    pub required: Vec<String>,

    /// Declared fields, in declaration order.
    #[serde(default)]
    pub fields: IndexMap<String, FieldKind>,
}

impl SchemaDecl {
    /// Get the kind of a declared field.
    pub fn field(&self, name: &str) -> Option<FieldKind> {
        self.fields.get(name).copied()
    }
}
