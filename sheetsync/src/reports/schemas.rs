//! Schemas command report data structures.

use super::output::{Output, Report};

/// Report data from listing schemas.
#[derive(Debug)]
pub struct SchemasReport {
    /// Schemas in registration order.
    pub schemas: Vec<SchemaInfo>,
    /// Simple names shared by several schemas, with their full paths.
    pub ambiguous: Vec<(String, Vec<String>)>,
}

/// One registered schema.
#[derive(Debug)]
pub struct SchemaInfo {
    /// Full type path.
    pub path: String,
    /// Whether it supports one artifact per row.
    pub line: bool,
    /// Field names and kinds.
    pub fields: Vec<(String, String)>,
    /// Fields that must be non-empty.
    pub required: Vec<String>,
}

impl Report for SchemasReport {
    fn render(&self, out: &mut dyn Output) {
        if self.schemas.is_empty() {
            out.preformatted("No schemas declared.");
            return;
        }

        for (i, schema) in self.schemas.iter().enumerate() {
            if i > 0 {
                out.newline();
            }
            if schema.line {
                out.section(&format!("{} (one artifact per row)", schema.path));
            } else {
                out.section(&schema.path);
            }
            for (name, kind) in &schema.fields {
                if schema.required.contains(name) {
                    out.list_item(&format!("{}: {}, required", name, kind));
                } else {
                    out.list_item(&format!("{}: {}", name, kind));
                }
            }
        }

        for (name, paths) in &self.ambiguous {
            out.warning(&format!(
                "type name '{}' is ambiguous, use one of {}",
                name,
                paths.join(", ")
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use sheetsync_manifest::Manifest;

    use super::*;
    use crate::{ops, reports::output::TextOutput};

    #[test]
    fn test_render_declared_schemas() {
        let manifest: Manifest = r#"
[schemas."items.Weapon"]
line = true
required = ["id"]
[schemas."items.Weapon".fields]
id = "string"
damage = "int"

[schemas."legacy.Weapon".fields]
id = "string"
"#
        .parse()
        .expect("Failed to parse manifest");

        let report = ops::schemas(&manifest);

        insta::assert_snapshot!(TextOutput::render(&report), @r"
        items.Weapon (one artifact per row):
          - id: string, required
          - damage: int

        legacy.Weapon:
          - id: string
        warning: type name 'Weapon' is ambiguous, use one of items.Weapon, legacy.Weapon
        ");
    }

    #[test]
    fn test_render_nothing_declared() {
        let report = ops::schemas(&Manifest::default());

        insta::assert_snapshot!(TextOutput::render(&report), @"No schemas declared.");
    }
}
