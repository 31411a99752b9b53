use std::path::{Path, PathBuf};

use super::Manifest;
use crate::Result;

/// Default manifest file name.
pub const DEFAULT_FILENAME: &str = "sheetsync.toml";

/// Represents a sheetsync.toml file with both raw content and parsed manifest.
#[derive(Debug, Clone)]
pub struct SheetsyncToml {
    path: PathBuf,
    content: String,
    manifest: Manifest,
}

impl SheetsyncToml {
    /// Open and parse a sheetsync.toml file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::new(crate::Error::Io {
                path: path.clone(),
                source: e,
            })
        })?;
        let filename = path.display().to_string();
        let manifest = Manifest::from_str_with_filename(&content, &filename)?;

        Ok(Self {
            path,
            content,
            manifest,
        })
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory relative entry paths resolve against.
    pub fn base_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Get the raw content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the parsed manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::Error;

    #[test]
    fn test_open() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_FILENAME);
        std::fs::write(
            &path,
            r#"
[[convert]]
source = "weapons.json"
output = "out"
type = "Weapon"
"#,
        )
        .unwrap();

        let file = SheetsyncToml::open(&path).unwrap();

        assert_eq!(file.path(), path);
        assert_eq!(file.base_dir(), temp.path());
        assert_eq!(file.manifest().convert.len(), 1);
        assert!(file.content().contains("weapons.json"));
    }

    #[test]
    fn test_open_missing() {
        let temp = TempDir::new().unwrap();
        let err = SheetsyncToml::open(temp.path().join(DEFAULT_FILENAME)).unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }

    #[test]
    fn test_base_dir_of_bare_filename() {
        let file = SheetsyncToml {
            path: PathBuf::from(DEFAULT_FILENAME),
            content: String::new(),
            manifest: Manifest::default(),
        };
        assert_eq!(file.base_dir(), Path::new("."));
    }
}
