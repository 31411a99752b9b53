use std::path::{Path, PathBuf};

use serde::Deserialize;

/// One `[[convert]]` entry: a workbook dump and how to convert its sheets.
///
/// Empty fields are not rejected while parsing. An entry with an empty
/// `source` or `output` is skipped when it runs, and an empty `type` or `key`
/// falls back to the values embedded in each sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvertEntry {
    /// Workbook dump to read, relative to the manifest directory.
    #[serde(default)]
    pub source: String,

    /// Base output directory, relative to the manifest directory.
    #[serde(default)]
    pub output: String,

    /// Target type name (simple name of a registered schema).
    #[serde(rename = "type", default)]
    pub type_name: String,

    /// Dot-separated key-field path.
    #[serde(default)]
    pub key: String,

    /// Generate one artifact per row instead of one per sheet.
    #[serde(default)]
    pub multi_file: bool,

    /// Put each sheet's artifacts in a sub-directory named after the sheet.
    /// Only used together with `multi_file`.
    #[serde(default)]
    pub child_folder: bool,
}

impl ConvertEntry {
    /// Resolve the source path against the manifest directory.
    pub fn source_path(&self, base: &Path) -> PathBuf {
        base.join(&self.source)
    }

    /// Resolve the output directory against the manifest directory.
    pub fn output_path(&self, base: &Path) -> PathBuf {
        base.join(&self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_resolve_against_base() {
        let entry = ConvertEntry {
            source: "data/weapons.json".into(),
            output: "generated".into(),
            ..Default::default()
        };
        let base = Path::new("/project");

        assert_eq!(
            entry.source_path(base),
            PathBuf::from("/project/data/weapons.json")
        );
        assert_eq!(entry.output_path(base), PathBuf::from("/project/generated"));
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let entry = ConvertEntry {
            source: "/data/weapons.json".into(),
            ..Default::default()
        };
        assert_eq!(
            entry.source_path(Path::new("/project")),
            PathBuf::from("/data/weapons.json")
        );
    }
}
