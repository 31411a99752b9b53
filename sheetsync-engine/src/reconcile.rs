//! Stale artifact detection.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use sheetsync_core::{ArtifactIdentity, ArtifactStore, StoreError};

/// Find the artifacts in `dir` whose identity is not in `kept`.
///
/// Only artifacts directly inside `dir` are considered. Sidecars are never
/// returned, they go with their artifact.
pub fn find_stale(
    store: &dyn ArtifactStore,
    dir: &Path,
    kept: &HashSet<ArtifactIdentity>,
) -> Result<Vec<PathBuf>, StoreError> {
    let mut stale = Vec::new();
    for path in store.list(dir)? {
        let Some(stem) = path.file_stem() else {
            continue;
        };
        if !kept.contains(&*stem.to_string_lossy()) {
            stale.push(path);
        }
    }
    Ok(stale)
}
