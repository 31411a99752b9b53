//! Lookup command report data structures.

use std::path::PathBuf;

use serde_json::Value;

use super::output::{Output, Report};
use crate::ops::lookup::Query;

/// Report data from a container lookup.
#[derive(Debug)]
pub struct LookupReport {
    /// Path of the container artifact.
    pub path: PathBuf,
    /// Schema path the artifact was written for.
    pub type_path: String,
    pub key_field: Option<String>,
    /// Number of items in the container.
    pub count: usize,
    pub query: Query,
    /// The matching record, if any.
    pub record: Option<Value>,
}

impl Report for LookupReport {
    fn render(&self, out: &mut dyn Output) {
        out.key_value("Artifact", &self.path.display().to_string());
        out.key_value_indented("type", &self.type_path);
        out.key_value_indented("key field", self.key_field.as_deref().unwrap_or("(none)"));
        out.key_value_indented("items", &self.count.to_string());

        let label = match &self.query {
            Query::Key(key) => format!("key '{}'", key),
            Query::Index(index) => format!("index {}", index),
        };

        let Some(record) = &self.record else {
            out.error(&format!("no record at {}", label));
            return;
        };

        out.divider(&label);
        match serde_json::to_string_pretty(record) {
            Ok(text) => out.preformatted(&text),
            Err(_) => out.preformatted(&record.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::reports::output::TextOutput;

    fn report(query: Query, record: Option<Value>) -> LookupReport {
        LookupReport {
            path: PathBuf::from("generated/Weapons.json"),
            type_path: "items.Weapon".into(),
            key_field: Some("id".into()),
            count: 2,
            query,
            record,
        }
    }

    #[test]
    fn test_render_found() {
        let report = report(
            Query::Key("axe".into()),
            Some(json!({"id": "axe", "damage": 7})),
        );

        insta::assert_snapshot!(TextOutput::render(&report), @r#"
        Artifact: generated/Weapons.json
          type: items.Weapon
          key field: id
          items: 2
        ── key 'axe' ──
        {
          "id": "axe",
          "damage": 7
        }
        "#);
    }

    #[test]
    fn test_render_missing() {
        let report = report(Query::Index(9), None);

        insta::assert_snapshot!(TextOutput::render(&report), @r"
        Artifact: generated/Weapons.json
          type: items.Weapon
          key field: id
          items: 2
        error: no record at index 9
        ");
    }
}
