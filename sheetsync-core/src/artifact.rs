//! Persisted artifact envelope and sidecar metadata.

use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// File extension of artifacts (without dot).
pub const ARTIFACT_EXTENSION: &str = "json";

/// Extension appended to an artifact's file name for its sidecar (without dot).
pub const SIDECAR_EXTENSION: &str = "meta";

/// What an artifact holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// A typed container with every row of a sheet (single-file mode).
    Container,
    /// One record derived from one row (multi-file mode).
    Record,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Container => "container",
            ArtifactKind::Record => "record",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted output object.
///
/// The `type` is the full path of the record schema the payload was built
/// from. It is how a later run recognizes whether an existing artifact can be
/// reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(rename = "type")]
    pub type_path: String,
    pub kind: ArtifactKind,
    /// Sheet the artifact was generated from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    pub data: Value,
}

impl Artifact {
    /// Create a container artifact.
    pub fn container(type_path: impl Into<String>, data: Value) -> Self {
        Self {
            type_path: type_path.into(),
            kind: ArtifactKind::Container,
            sheet: None,
            data,
        }
    }

    /// Create a record artifact.
    pub fn record(type_path: impl Into<String>, data: Value) -> Self {
        Self {
            type_path: type_path.into(),
            kind: ArtifactKind::Record,
            sheet: None,
            data,
        }
    }

    /// Attach the originating sheet name.
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    /// Whether this artifact was built for the given schema and kind.
    pub fn is_instance_of(&self, type_path: &str, kind: ArtifactKind) -> bool {
        self.type_path == type_path && self.kind == kind
    }
}

/// Sidecar metadata stored next to every artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMeta {
    #[serde(rename = "type")]
    pub type_path: String,
    pub kind: ArtifactKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    pub generator: String,
}

impl ArtifactMeta {
    /// Metadata describing the given artifact.
    pub fn for_artifact(artifact: &Artifact) -> Self {
        Self {
            type_path: artifact.type_path.clone(),
            kind: artifact.kind,
            sheet: artifact.sheet.clone(),
            generator: format!("sheetsync {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Path of the artifact with the given stem inside `dir`.
pub fn artifact_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{}.{}", stem, ARTIFACT_EXTENSION))
}

/// Path of the sidecar belonging to an artifact (`<name>.json.meta`).
pub fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = OsString::from(artifact.as_os_str());
    name.push(".");
    name.push(SIDECAR_EXTENSION);
    PathBuf::from(name)
}

/// Whether a path names an artifact file. Sidecars do not.
pub(crate) fn is_artifact(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == ARTIFACT_EXTENSION)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_artifact_path() {
        assert_eq!(
            artifact_path(Path::new("out/weapons"), "sword"),
            PathBuf::from("out/weapons/sword.json")
        );
    }

    #[test]
    fn test_sidecar_path() {
        let path = PathBuf::from("out/sword.json");
        assert_eq!(sidecar_path(&path), PathBuf::from("out/sword.json.meta"));
        assert!(is_artifact(&path));
        assert!(!is_artifact(&sidecar_path(&path)));
    }

    #[test]
    fn test_envelope_shape() {
        let artifact = Artifact::record("items.Weapon", json!({"id": "sword"})).with_sheet("Weapons");
        let value = serde_json::to_value(&artifact).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "items.Weapon",
                "kind": "record",
                "sheet": "Weapons",
                "data": {"id": "sword"}
            })
        );
    }

    #[test]
    fn test_is_instance_of() {
        let artifact = Artifact::container("items.Weapon", json!({}));
        assert!(artifact.is_instance_of("items.Weapon", ArtifactKind::Container));
        assert!(!artifact.is_instance_of("items.Weapon", ArtifactKind::Record));
        assert!(!artifact.is_instance_of("items.Armor", ArtifactKind::Container));
    }
}
