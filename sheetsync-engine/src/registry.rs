//! Schema registry and type resolution.
//!
//! Schemas are registered under their full type path and resolved by their
//! simple name, which is how conversion entries and sheets refer to types:
//!
//! ```ignore
//! let mut registry = SchemaRegistry::new();
//! registry.register_line::<Weapon>().register::<Armor>();
//! registry.register_manifest(&manifest);
//!
//! let schema = registry.resolve("Weapon")?;
//! ```

use std::sync::Arc;

use indexmap::IndexMap;
use sheetsync_core::simple_name;
use sheetsync_manifest::Manifest;
use tracing::{debug, warn};

use crate::{
    ConvertError, Result,
    schema::{DeclaredSchema, LineRecord, Record, Schema},
};

/// Registry of the record schemas a run can convert into.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every schema declared in a manifest.
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let mut registry = Self::new();
        registry.register_manifest(manifest);
        registry
    }

    /// Register a Rust record type.
    pub fn register<T: Record>(&mut self) -> &mut Self {
        self.register_schema(Schema::of::<T>())
    }

    /// Register a Rust record type with the per-row capability.
    pub fn register_line<T: LineRecord>(&mut self) -> &mut Self {
        self.register_schema(Schema::line::<T>())
    }

    /// Register every schema declared in a manifest.
    pub fn register_manifest(&mut self, manifest: &Manifest) -> &mut Self {
        for (path, decl) in &manifest.schemas {
            self.register_schema(DeclaredSchema::new(path, decl).into_schema(decl.line));
        }
        self
    }

    /// Register a schema.
    ///
    /// A schema with the same full path replaces the previous one. A schema
    /// whose simple name is already taken by another path is registered, but
    /// that name no longer resolves.
    pub fn register_schema(&mut self, schema: Schema) -> &mut Self {
        let path = schema.path().to_string();
        let name = schema.name().to_string();

        let clashes: Vec<&str> = self
            .schemas
            .keys()
            .filter(|existing| **existing != path && simple_name(existing) == name)
            .map(String::as_str)
            .collect();
        if !clashes.is_empty() {
            warn!(
                "schema '{}' shares the name '{}' with {}; '{}' will not resolve",
                path,
                name,
                clashes.join(", "),
                name
            );
        }

        if self.schemas.insert(path.clone(), Arc::new(schema)).is_some() {
            debug!("replaced schema '{}'", path);
        } else {
            debug!("registered schema '{}'", path);
        }
        self
    }

    /// Resolve a type name to its schema.
    ///
    /// Names are matched against the simple name of every registered schema.
    /// A name containing a path separator must match a full path exactly.
    pub fn resolve(&self, name: &str) -> Result<Arc<Schema>> {
        let name = name.trim();

        if name.contains('.') || name.contains("::") {
            return self
                .schemas
                .get(name)
                .cloned()
                .ok_or_else(|| ConvertError::UnknownType {
                    name: name.to_string(),
                });
        }

        let mut matches = self
            .schemas
            .values()
            .filter(|schema| schema.name() == name);

        match (matches.next(), matches.next()) {
            (Some(schema), None) => Ok(Arc::clone(schema)),
            (None, _) => Err(ConvertError::UnknownType {
                name: name.to_string(),
            }),
            (Some(_), Some(_)) => Err(ConvertError::AmbiguousType {
                name: name.to_string(),
                candidates: self.candidates(name),
            }),
        }
    }

    fn candidates(&self, name: &str) -> Vec<String> {
        self.schemas
            .keys()
            .filter(|path| simple_name(path) == name)
            .cloned()
            .collect()
    }

    /// Simple names shared by more than one schema, with their full paths.
    pub fn ambiguous_names(&self) -> Vec<(String, Vec<String>)> {
        let mut by_name: IndexMap<&str, Vec<String>> = IndexMap::new();
        for path in self.schemas.keys() {
            by_name
                .entry(simple_name(path))
                .or_default()
                .push(path.clone());
        }

        by_name
            .into_iter()
            .filter(|(_, paths)| paths.len() > 1)
            .map(|(name, paths)| (name.to_string(), paths))
            .collect()
    }

    /// Get a schema by its full path.
    pub fn get(&self, path: &str) -> Option<&Arc<Schema>> {
        self.schemas.get(path)
    }

    /// Schemas in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::{ErrorClass, field_access};

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Weapon {
        id: String,
    }
    field_access!(Weapon { id });
    impl Record for Weapon {
        const TYPE_PATH: &'static str = "items.Weapon";
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct LegacyWeapon {
        id: String,
    }
    field_access!(LegacyWeapon { id });
    impl Record for LegacyWeapon {
        const TYPE_PATH: &'static str = "legacy::Weapon";
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Armor {
        id: String,
    }
    field_access!(Armor { id });
    impl Record for Armor {
        const TYPE_PATH: &'static str = "items.Armor";
    }
    impl LineRecord for Armor {}

    #[test]
    fn test_resolve_by_simple_name() {
        let mut registry = SchemaRegistry::new();
        registry.register::<Weapon>().register_line::<Armor>();

        assert_eq!(registry.resolve("Weapon").unwrap().path(), "items.Weapon");
        assert!(registry.resolve("Armor").unwrap().is_line());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_resolve_is_exact() {
        let mut registry = SchemaRegistry::new();
        registry.register::<Weapon>();

        assert!(registry.resolve("weapon").is_err());
        assert!(registry.resolve("Weap").is_err());
        assert!(registry.resolve(" Weapon ").is_ok());
    }

    #[test]
    fn test_unknown_type() {
        let registry = SchemaRegistry::new();
        let err = registry.resolve("Weapon").unwrap_err();

        assert!(matches!(err, ConvertError::UnknownType { ref name } if name == "Weapon"));
        assert_eq!(err.class(), ErrorClass::Configuration);
    }

    #[test]
    fn test_ambiguous_simple_name() {
        let mut registry = SchemaRegistry::new();
        registry.register::<Weapon>().register::<LegacyWeapon>();

        let err = registry.resolve("Weapon").unwrap_err();
        match err {
            ConvertError::AmbiguousType { name, candidates } => {
                assert_eq!(name, "Weapon");
                assert_eq!(candidates, vec!["items.Weapon", "legacy::Weapon"]);
            }
            other => panic!("expected ambiguous type, got {other:?}"),
        }

        assert_eq!(
            registry.ambiguous_names(),
            vec![(
                "Weapon".to_string(),
                vec!["items.Weapon".to_string(), "legacy::Weapon".to_string()]
            )]
        );
    }

    #[test]
    fn test_full_path_disambiguates() {
        let mut registry = SchemaRegistry::new();
        registry.register::<Weapon>().register::<LegacyWeapon>();

        assert_eq!(
            registry.resolve("legacy::Weapon").unwrap().path(),
            "legacy::Weapon"
        );
        assert!(registry.resolve("other.Weapon").is_err());
    }

    #[test]
    fn test_same_path_replaces() {
        let mut registry = SchemaRegistry::new();
        registry.register::<Weapon>().register::<Weapon>();

        assert_eq!(registry.len(), 1);
        assert!(registry.ambiguous_names().is_empty());
        assert!(registry.resolve("Weapon").is_ok());
    }

    #[test]
    fn test_from_manifest() {
        let manifest: Manifest = r#"
[schemas."items.Potion"]
line = true
[schemas."items.Potion".fields]
id = "string"
"#
        .parse()
        .unwrap();

        let registry = SchemaRegistry::from_manifest(&manifest);
        let schema = registry.resolve("Potion").unwrap();

        assert!(schema.is_line());
        assert!(schema.has_field("id"));
        assert!(registry.get("items.Potion").is_some());
    }
}
