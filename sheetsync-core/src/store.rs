//! Artifact storage.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

use crate::artifact::{Artifact, ArtifactMeta, is_artifact, sidecar_path};

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// Artifact did not exist before
    Created,
    /// Existing artifact was overwritten
    Updated,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to {action} '{path}'")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{path}' is not a readable artifact")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode artifact '{path}'")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode sidecar of '{path}'")]
    Sidecar {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },
}

impl StoreError {
    fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path of the artifact or directory the error concerns.
    pub fn path(&self) -> &Path {
        match self {
            StoreError::Io { path, .. }
            | StoreError::Corrupt { path, .. }
            | StoreError::Encode { path, .. }
            | StoreError::Sidecar { path, .. } => path,
        }
    }
}

/// Create, load, overwrite and delete persisted artifacts.
///
/// Every artifact has a sidecar metadata file next to it. Implementations keep
/// the two in sync: `write` writes both and `delete` removes both.
pub trait ArtifactStore {
    /// Create a directory (and its parents) if it does not exist.
    ///
    /// Returns `true` when the directory was created.
    fn ensure_dir(&self, dir: &Path) -> Result<bool, StoreError>;

    /// Check whether an artifact exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Load the artifact at `path`, `None` if there is none.
    fn load(&self, path: &Path) -> Result<Option<Artifact>, StoreError>;

    /// Write the artifact and its sidecar, replacing any previous content.
    fn write(&self, path: &Path, artifact: &Artifact) -> Result<WriteResult, StoreError>;

    /// Delete the artifact and its sidecar.
    ///
    /// Returns `true` if an artifact was removed.
    fn delete(&self, path: &Path) -> Result<bool, StoreError>;

    /// List the artifacts directly inside `dir`, sorted by path.
    ///
    /// Sidecar files are never listed. A missing directory has no artifacts.
    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>, StoreError>;
}

/// Artifact store backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl FsStore {
    pub fn new() -> Self {
        Self
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::io("create directory", parent, e))?;
    }
    fs::write(path, content).map_err(|e| StoreError::io("write", path, e))
}

fn remove_if_exists(path: &Path) -> Result<bool, StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(StoreError::io("delete", path, e)),
    }
}

impl ArtifactStore for FsStore {
    fn ensure_dir(&self, dir: &Path) -> Result<bool, StoreError> {
        if dir.is_dir() {
            return Ok(false);
        }
        fs::create_dir_all(dir).map_err(|e| StoreError::io("create directory", dir, e))?;
        debug!("created directory {}", dir.display());
        Ok(true)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn load(&self, path: &Path) -> Result<Option<Artifact>, StoreError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io("read", path, e)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                path: path.to_path_buf(),
                source,
            })
    }

    fn write(&self, path: &Path, artifact: &Artifact) -> Result<WriteResult, StoreError> {
        let existed = self.exists(path);

        let mut content =
            serde_json::to_string_pretty(artifact).map_err(|source| StoreError::Encode {
                path: path.to_path_buf(),
                source,
            })?;
        content.push('\n');

        let meta = toml::to_string(&ArtifactMeta::for_artifact(artifact)).map_err(|source| {
            StoreError::Sidecar {
                path: path.to_path_buf(),
                source,
            }
        })?;

        write_file(path, &content)?;
        write_file(&sidecar_path(path), &meta)?;

        Ok(if existed {
            WriteResult::Updated
        } else {
            WriteResult::Created
        })
    }

    fn delete(&self, path: &Path) -> Result<bool, StoreError> {
        let removed = remove_if_exists(path)?;
        remove_if_exists(&sidecar_path(path))?;
        Ok(removed)
    }

    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io("list", dir, e)),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::io("list", dir, e))?.path();
            if is_artifact(&path) && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::artifact::{ArtifactKind, artifact_path};

    fn sword() -> Artifact {
        Artifact::record("items.Weapon", json!({"id": "sword", "damage": 12})).with_sheet("Weapons")
    }

    #[test]
    fn test_write_creates_artifact_and_sidecar() {
        let temp = TempDir::new().unwrap();
        let path = artifact_path(temp.path(), "sword");

        let result = FsStore.write(&path, &sword()).unwrap();

        assert_eq!(result, WriteResult::Created);
        assert!(path.exists());
        assert!(sidecar_path(&path).exists());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = artifact_path(&temp.path().join("a").join("b"), "sword");

        FsStore.write(&path, &sword()).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_write_reports_update() {
        let temp = TempDir::new().unwrap();
        let path = artifact_path(temp.path(), "sword");

        FsStore.write(&path, &sword()).unwrap();
        let result = FsStore.write(&path, &sword()).unwrap();

        assert_eq!(result, WriteResult::Updated);
    }

    #[test]
    fn test_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = artifact_path(temp.path(), "sword");

        FsStore.write(&path, &sword()).unwrap();
        let loaded = FsStore.load(&path).unwrap().unwrap();

        assert_eq!(loaded, sword());
        assert_eq!(loaded.kind, ArtifactKind::Record);
    }

    #[test]
    fn test_load_missing_is_none() {
        let temp = TempDir::new().unwrap();
        let loaded = FsStore.load(&temp.path().join("nope.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = FsStore.load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        assert_eq!(err.path(), path);
    }

    #[test]
    fn test_sidecar_content() {
        let temp = TempDir::new().unwrap();
        let path = artifact_path(temp.path(), "sword");

        FsStore.write(&path, &sword()).unwrap();
        let meta: ArtifactMeta =
            toml::from_str(&fs::read_to_string(sidecar_path(&path)).unwrap()).unwrap();

        assert_eq!(meta.type_path, "items.Weapon");
        assert_eq!(meta.kind, ArtifactKind::Record);
        assert_eq!(meta.sheet.as_deref(), Some("Weapons"));
    }

    #[test]
    fn test_delete_removes_sidecar() {
        let temp = TempDir::new().unwrap();
        let path = artifact_path(temp.path(), "sword");
        FsStore.write(&path, &sword()).unwrap();

        assert!(FsStore.delete(&path).unwrap());
        assert!(!path.exists());
        assert!(!sidecar_path(&path).exists());
        assert!(!FsStore.delete(&path).unwrap());
    }

    #[test]
    fn test_list_skips_sidecars_and_other_files() {
        let temp = TempDir::new().unwrap();
        for stem in ["b", "a"] {
            FsStore
                .write(&artifact_path(temp.path(), stem), &sword())
                .unwrap();
        }
        fs::write(temp.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(temp.path().join("nested.json")).unwrap();

        let listed = FsStore.list(temp.path()).unwrap();

        assert_eq!(
            listed,
            vec![
                artifact_path(temp.path(), "a"),
                artifact_path(temp.path(), "b")
            ]
        );
    }

    #[test]
    fn test_list_missing_dir() {
        let temp = TempDir::new().unwrap();
        assert!(FsStore.list(&temp.path().join("missing")).unwrap().is_empty());
    }

    #[test]
    fn test_ensure_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("out").join("weapons");

        assert!(FsStore.ensure_dir(&dir).unwrap());
        assert!(dir.is_dir());
        assert!(!FsStore.ensure_dir(&dir).unwrap());
    }
}
