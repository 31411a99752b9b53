use serde::Deserialize;

/// `[settings]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Delete multi-file artifacts whose identity no longer appears in the source.
    #[serde(default)]
    pub prune_stale: bool,
}
