//! Filesystem-safe artifact identities.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use tracing::warn;

/// Characters that are rejected in file names on at least one supported platform.
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replacement for invalid characters.
const REPLACEMENT: char = '_';

static SYNTHETIC_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Sanitized, non-empty identity of a multi-file artifact.
///
/// The identity is the artifact's file stem. It never contains path
/// separators or other characters that are illegal in file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactIdentity(String);

impl ArtifactIdentity {
    /// Derive an identity from a raw key value.
    ///
    /// Illegal characters are replaced with `_` and surrounding whitespace is
    /// trimmed. When nothing usable remains (empty input, only illegal
    /// characters or whitespace) or the result would be a hidden file, a
    /// synthetic identity is generated instead.
    ///
    /// # Example
    ///
    /// ```
    /// use sheetsync_core::ArtifactIdentity;
    ///
    /// assert_eq!(ArtifactIdentity::sanitize("a/b:c").as_str(), "a_b_c");
    /// assert!(ArtifactIdentity::sanitize("").as_str().starts_with("unnamed_"));
    /// ```
    pub fn sanitize(raw: &str) -> Self {
        let mut usable = false;
        let replaced: String = raw
            .chars()
            .map(|c| {
                if INVALID_CHARS.contains(&c) || c.is_control() {
                    REPLACEMENT
                } else {
                    if !c.is_whitespace() {
                        usable = true;
                    }
                    c
                }
            })
            .collect();
        let trimmed = replaced.trim();

        if !usable || trimmed.starts_with('.') {
            let synthetic = Self::synthetic();
            warn!(
                "key value {:?} has no usable file name, using '{}'",
                raw, synthetic
            );
            return synthetic;
        }

        Self(trimmed.to_string())
    }

    /// Whether `name` can be used as a file or directory name as it is.
    ///
    /// Rejects empty names, hidden names (including `.` and `..`), names
    /// with surrounding whitespace and names holding illegal characters.
    pub fn is_valid(name: &str) -> bool {
        !name.trim().is_empty()
            && name.trim() == name
            && !name.starts_with('.')
            && !name
                .chars()
                .any(|c| INVALID_CHARS.contains(&c) || c.is_control())
    }

    /// Generate a unique timestamp-based identity.
    pub fn synthetic() -> Self {
        let ticks = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let sequence = SYNTHETIC_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("unnamed_{}_{}", ticks, sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ArtifactIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ArtifactIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for ArtifactIdentity {
    fn borrow(&self) -> &str {
        &self.0
    }
}
