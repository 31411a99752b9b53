//! Manifest types and parsing for sheetsync.toml files.

mod convert;
mod file;
mod parse;
mod schema;
mod settings;
mod validate;

use indexmap::IndexMap;
use serde::Deserialize;

pub use convert::ConvertEntry;
pub use file::{DEFAULT_FILENAME, SheetsyncToml};
pub use schema::SchemaDecl;
pub use settings::Settings;
pub use validate::ParseContext;

/// Root manifest for sheetsync.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Run-wide settings
    #[serde(default)]
    pub settings: Settings,

    /// Declared record schemas, keyed by full type path
    #[serde(default)]
    pub schemas: IndexMap<String, SchemaDecl>,

    /// Per-file conversion entries, in run order
    #[serde(default)]
    pub convert: Vec<ConvertEntry>,
}

impl Manifest {
    /// Get a declared schema by its full path.
    pub fn schema(&self, path: &str) -> Option<&SchemaDecl> {
        self.schemas.get(path)
    }

    /// Entries whose source matches `source` exactly.
    pub fn entries_for(&self, source: &str) -> impl Iterator<Item = &ConvertEntry> {
        self.convert.iter().filter(move |entry| entry.source == source)
    }
}
