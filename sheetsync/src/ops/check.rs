//! Check operation - validate the conversion entries of a manifest.
//!
//! Parsing already rejected malformed manifests. This checks what only shows
//! up once schemas are registered: unresolvable type names, multi-file
//! entries that cannot work, and names shared by several schemas.

use std::path::Path;

use sheetsync_engine::{ConvertError, KeyPath, SchemaRegistry};
use sheetsync_manifest::{ConvertEntry, Manifest};

use crate::reports::CheckReport;

/// Execute the check operation.
pub fn check(manifest: &Manifest, config_path: &Path, base_dir: &Path) -> CheckReport {
    let registry = SchemaRegistry::from_manifest(manifest);
    let mut report = CheckReport {
        config_path: config_path.to_path_buf(),
        schemas: registry.len(),
        entries: manifest.convert.len(),
        errors: Vec::new(),
        warnings: Vec::new(),
        infos: Vec::new(),
    };

    for (name, paths) in registry.ambiguous_names() {
        report.warnings.push(format!(
            "type name '{}' is ambiguous, use one of {}",
            name,
            paths.join(", ")
        ));
    }

    for (index, entry) in manifest.convert.iter().enumerate() {
        check_entry(
            &registry,
            entry,
            base_dir,
            &format!("convert[{}]", index),
            &mut report,
        );
    }

    report
}

fn check_entry(
    registry: &SchemaRegistry,
    entry: &ConvertEntry,
    base_dir: &Path,
    location: &str,
    report: &mut CheckReport,
) {
    let at = |msg: String| format!("{}\n  --> {}", msg, location);

    if entry.source.trim().is_empty() {
        report.errors.push(at(ConvertError::MissingSource.to_string()));
    } else if !entry.source_path(base_dir).is_file() {
        report
            .warnings
            .push(at(format!("source '{}' does not exist", entry.source)));
    }

    if entry.output.trim().is_empty() {
        report.errors.push(at(ConvertError::MissingOutput.to_string()));
    }

    if entry.child_folder && !entry.multi_file {
        report
            .warnings
            .push(at("child_folder has no effect without multi_file".to_string()));
    }

    let key = entry.key.trim();
    let key_path = if key.is_empty() {
        report
            .infos
            .push(at("key comes from each sheet's keyName".to_string()));
        None
    } else {
        match KeyPath::parse(key) {
            Ok(path) => Some(path),
            Err(e) => {
                report.errors.push(at(e.to_string()));
                None
            }
        }
    };

    if entry.type_name.trim().is_empty() {
        report
            .infos
            .push(at("type comes from each sheet's className".to_string()));
        return;
    }

    let schema = match registry.resolve(&entry.type_name) {
        Ok(schema) => schema,
        Err(e) => {
            report.errors.push(at(e.to_string()));
            return;
        }
    };

    if entry.multi_file && !schema.is_line() {
        let err = ConvertError::NotLineCapable {
            schema: schema.path().to_string(),
        };
        report.errors.push(at(err.to_string()));
    }

    if let Some(path) = key_path {
        let head = &path.segments()[0];
        if !schema.has_field(head) {
            report.warnings.push(at(format!(
                "key field '{}' is not a field of '{}'",
                head,
                schema.path()
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(toml: &str) -> CheckReport {
        let manifest: Manifest = toml.parse().expect("Failed to parse manifest");
        check(&manifest, Path::new("sheetsync.toml"), Path::new("."))
    }

    const SCHEMAS: &str = r#"
[schemas."items.Weapon"]
line = true
[schemas."items.Weapon".fields]
id = "string"

[schemas."config.Setting".fields]
name = "string"

[schemas."legacy.Weapon".fields]
id = "string"
"#;

    #[test]
    fn test_ambiguous_names_are_reported() {
        let report = run(SCHEMAS);

        assert!(report.is_valid());
        assert_eq!(report.schemas, 3);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("items.Weapon, legacy.Weapon"));
    }

    #[test]
    fn test_entry_problems() {
        let toml = format!(
            "{}{}",
            SCHEMAS,
            r#"
[[convert]]
source = ""
output = "out"
type = "Weapon"

[[convert]]
source = "x.json"
output = "out"
type = "Setting"
key = "name"
multi_file = true

[[convert]]
source = "x.json"
output = "out"
type = "items.Weapon"
key = "stats..id"
"#
        );

        let report = run(&toml);

        assert!(!report.is_valid());
        assert_eq!(report.entries, 3);
        assert!(report.errors[0].contains("no source configured"));
        assert!(report.errors[1].contains("is ambiguous"));
        assert!(report.errors[1].ends_with("--> convert[0]"));
        assert!(report.errors[2].contains("does not support one artifact per row"));
        assert!(report.errors[3].contains("invalid key path 'stats..id'"));
        assert_eq!(report.errors.len(), 4);
    }

    #[test]
    fn test_key_outside_schema_warns() {
        let toml = format!(
            "{}{}",
            SCHEMAS,
            r#"
[[convert]]
source = "x.json"
output = "out"
type = "Setting"
key = "id"
"#
        );

        let report = run(&toml);

        assert!(report.is_valid());
        assert!(
            report
                .warnings
                .iter()
                .any(|w| w.contains("key field 'id' is not a field of 'config.Setting'"))
        );
    }
}
