//! Lookup operation - read one record out of a container artifact.

use std::path::Path;

use eyre::{Result, eyre};
use serde_json::Value;
use sheetsync_core::{ArtifactStore, FsStore};
use sheetsync_engine::TypedContainer;

use crate::reports::LookupReport;

/// What to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Key(String),
    Index(usize),
}

/// Execute the lookup operation.
///
/// Fails when the file is not a container artifact. A query that matches
/// nothing is reported, not an error.
pub fn lookup(path: &Path, query: Query) -> Result<LookupReport> {
    let artifact = FsStore::new()
        .load(path)?
        .ok_or_else(|| eyre!("artifact '{}' does not exist", path.display()))?;
    let container = TypedContainer::<Value>::from_artifact(&artifact, path)?;

    let record = match &query {
        Query::Key(key) => {
            if container.key_field().is_none() {
                return Err(eyre!(
                    "artifact '{}' has no key field, look up by --index instead",
                    path.display()
                ));
            }
            container.get_by_key(key).cloned()
        }
        Query::Index(index) => container.get(*index).cloned(),
    };

    Ok(LookupReport {
        path: path.to_path_buf(),
        type_path: artifact.type_path,
        key_field: container.key_field().map(str::to_string),
        count: container.count(),
        query,
        record,
    })
}
