//! Validation context and utilities for manifest parsing.

use std::sync::Arc;

use miette::SourceSpan;

use crate::{Error, Result, error::SourceContext};

/// Parsing and validation context that carries source information.
///
/// Holds the source content, filename, and current path through the
/// manifest hierarchy so nested validation can report where it failed.
///
/// # Example
///
/// ```ignore
/// let ctx = ParseContext::new(src, "sheetsync.toml");
/// ctx.validate_schema_path("items.Weapon")?;
///
/// let schema_ctx = ctx.push("items.Weapon");
/// schema_ctx.validate_field_name("damage")?;
/// ```
#[derive(Debug, Clone)]
pub struct ParseContext<'a> {
    /// Source context for error reporting (shared across nested contexts)
    source: Arc<SourceContext>,
    /// Path segments for nested validation (e.g., ["items.Weapon"])
    path: Vec<&'a str>,
}

impl<'a> ParseContext<'a> {
    pub fn new(src: &str, filename: &str) -> Self {
        Self {
            source: Arc::new(SourceContext::new(src, filename)),
            path: Vec::new(),
        }
    }

    pub fn src(&self) -> &str {
        self.source.src()
    }

    pub fn filename(&self) -> &str {
        self.source.filename()
    }

    /// Push a path segment and return a new context.
    pub fn push(&self, segment: &'a str) -> Self {
        let mut new_path = self.path.clone();
        new_path.push(segment);
        Self {
            source: Arc::clone(&self.source),
            path: new_path,
        }
    }

    /// Get the current path joined with `/`.
    pub fn path_string(&self) -> String {
        self.path.join("/")
    }

    /// Get a context description for error messages.
    ///
    /// For example: "field in 'items.Weapon'" or just "field" if no path.
    pub fn context_for(&self, kind: &str) -> String {
        if self.path.is_empty() {
            kind.to_string()
        } else {
            format!("{} in '{}'", kind, self.path_string())
        }
    }

    /// Find the span of a key or string value in the source.
    pub fn find_span(&self, name: &str) -> Option<SourceSpan> {
        find_key_span(self.source.src(), name)
    }

    /// Validate a schema's full type path.
    pub fn validate_schema_path(&self, path: &str) -> Result<()> {
        if let Some(reason) = schema_path_error(path) {
            return Err(self
                .source
                .invalid_schema_path_error(path, reason, self.find_span(path)));
        }
        Ok(())
    }

    /// Validate a declared field name.
    pub fn validate_field_name(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(self.source.validation_error(
                format!("{} name cannot be empty", self.context_for("field")),
                self.find_span(name),
            ));
        }
        Ok(())
    }

    /// Error for a `required` entry that names no declared field.
    pub fn undeclared_field(&self, field: &str) -> Box<Error> {
        self.source
            .undeclared_field_error(self.path_string(), field, self.find_span(field))
    }
}

/// Check a schema path, returning the reason it is invalid.
pub(crate) fn schema_path_error(path: &str) -> Option<&'static str> {
    if path.trim().is_empty() {
        return Some("schema path cannot be empty");
    }

    for segment in path.split("::").flat_map(|part| part.split('.')) {
        if segment.is_empty() {
            return Some("schema path cannot contain empty segments");
        }
        if segment.chars().any(char::is_whitespace) {
            return Some("schema path segments cannot contain whitespace");
        }
    }

    None
}

/// Find the span of a name in the TOML source.
///
/// Quoted occurrences (`"name"` or `'name'`) are preferred and their span
/// includes the quotes. Bare keys are matched in table headers (`.name]`,
/// `.name.`) and at the start of a line (`name =`).
pub(crate) fn find_key_span(src: &str, name: &str) -> Option<SourceSpan> {
    for quote in ['"', '\''] {
        let pattern = format!("{quote}{name}{quote}");
        if let Some(pos) = src.find(&pattern) {
            return Some(SourceSpan::from((pos, pattern.len())));
        }
    }

    if name.is_empty() {
        return None;
    }

    for pattern in [format!(".{}]", name), format!(".{}.", name)] {
        if let Some(pos) = src.find(&pattern) {
            return Some(SourceSpan::from((pos + 1, name.len())));
        }
    }

    let mut offset = 0;
    for line in src.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();
        let is_key = trimmed
            .strip_prefix(name)
            .is_some_and(|rest| rest.trim_start().starts_with('='));
        if is_key {
            return Some(SourceSpan::from((offset + indent, name.len())));
        }
        offset += line.len();
    }

    None
}
