//! Key-field paths.

use std::fmt;

use sheetsync_ir::{RawRow, RawValue};

use crate::{ConvertError, Result};

/// A dot-separated path to a row's key field (e.g., "stats.id").
///
/// Each segment but the last names a nested row. The last segment names the
/// scalar that identifies the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Parse a key path. Empty paths and empty segments are rejected.
    pub fn parse(path: &str) -> Result<Self> {
        let path = path.trim();
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();

        if path.is_empty() || segments.iter().any(|s| s.trim().is_empty()) {
            return Err(ConvertError::InvalidKeyPath {
                path: path.to_string(),
            });
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Find the key value of a row.
    ///
    /// Returns `None` when a segment is missing, when the walk meets a
    /// scalar before the last segment, or when the last segment holds a
    /// null, a list or a nested row.
    pub fn resolve<'a>(&self, row: &'a RawRow) -> Option<&'a RawValue> {
        let (last, parents) = self.segments.split_last()?;

        let mut current = row;
        for segment in parents {
            current = current.get(segment)?.as_row()?;
        }

        current.get(last).filter(|value| value.is_scalar())
    }

    /// Key text of a row, see [`KeyPath::resolve`].
    pub fn extract(&self, row: &RawRow) -> Option<String> {
        self.resolve(row).and_then(RawValue::scalar_text)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}
