//! Schemas operation - list the registered record schemas.

use sheetsync_engine::SchemaRegistry;
use sheetsync_manifest::Manifest;

use crate::reports::{SchemaInfo, SchemasReport};

/// Execute the schemas operation.
pub fn schemas(manifest: &Manifest) -> SchemasReport {
    let registry = SchemaRegistry::from_manifest(manifest);

    let schemas = registry
        .iter()
        .map(|schema| SchemaInfo {
            path: schema.path().to_string(),
            line: schema.is_line(),
            fields: schema
                .fields()
                .iter()
                .map(|f| (f.name.clone(), f.kind.as_str().to_string()))
                .collect(),
            required: manifest
                .schema(schema.path())
                .map(|decl| decl.required.clone())
                .unwrap_or_default(),
        })
        .collect();

    SchemasReport {
        schemas,
        ambiguous: registry.ambiguous_names(),
    }
}
