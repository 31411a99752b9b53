//! Conversion errors.

use std::{fmt, io, path::PathBuf};

use miette::Diagnostic;
use serde::Serialize;
use sheetsync_core::StoreError;
use thiserror::Error;

/// Result type for conversion operations.
pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

/// Broad class of a conversion error.
///
/// The class decides the scope an error aborts: configuration errors skip a
/// sheet, data-format errors skip a row (or a malformed sheet), IO errors
/// abandon the artifact operation in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    Configuration,
    DataFormat,
    Io,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::Configuration => "configuration",
            ErrorClass::DataFormat => "data format",
            ErrorClass::Io => "io",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConvertError {
    #[error("unknown type '{name}'")]
    #[diagnostic(
        code(sheetsync::unknown_type),
        help("register the record type or declare it under [schemas] in sheetsync.toml")
    )]
    UnknownType { name: String },

    #[error("type name '{name}' is ambiguous, it matches {}", .candidates.join(", "))]
    #[diagnostic(
        code(sheetsync::ambiguous_type),
        help("use the full type path or rename one of the schemas")
    )]
    AmbiguousType {
        name: String,
        candidates: Vec<String>,
    },

    #[error("no type configured for sheet '{sheet}'")]
    #[diagnostic(
        code(sheetsync::missing_type),
        help("set `type` on the [[convert]] entry or add a className to the sheet")
    )]
    MissingType { sheet: String },

    #[error("no source configured")]
    #[diagnostic(code(sheetsync::missing_source))]
    MissingSource,

    #[error("no output directory configured")]
    #[diagnostic(code(sheetsync::missing_output))]
    MissingOutput,

    #[error("schema '{schema}' does not support one artifact per row")]
    #[diagnostic(
        code(sheetsync::not_line_capable),
        help("register the type with `register_line` or set `line = true` on the declared schema")
    )]
    NotLineCapable { schema: String },

    #[error("sheet '{sheet}' needs a key field for one artifact per row")]
    #[diagnostic(
        code(sheetsync::missing_key),
        help("set `key` on the [[convert]] entry or add a keyName to the sheet")
    )]
    MissingKeyField { sheet: String },

    #[error("sheet name {sheet:?} cannot be used as a file name")]
    #[diagnostic(
        code(sheetsync::invalid_sheet_name),
        help("rename the sheet, names must not hold path separators or start with a dot")
    )]
    InvalidSheetName { sheet: String },

    #[error("invalid key path '{path}'")]
    #[diagnostic(
        code(sheetsync::invalid_key_path),
        help("key paths are dot-separated field names such as \"stats.id\"")
    )]
    InvalidKeyPath { path: String },

    #[error("container has no key field")]
    #[diagnostic(code(sheetsync::no_key_field))]
    NoKeyField,

    #[error("cannot convert {found} into {target}: {message}")]
    #[diagnostic(code(sheetsync::coerce))]
    Coerce {
        target: String,
        found: &'static str,
        message: String,
    },

    #[error("field '{field}': cannot convert {found} into {target}: {message}")]
    #[diagnostic(code(sheetsync::coerce))]
    CoerceField {
        field: String,
        target: String,
        found: &'static str,
        message: String,
    },

    #[error("'{schema}' rejected the record: {message}")]
    #[diagnostic(code(sheetsync::process))]
    Process { schema: String, message: String },

    #[error("sheet '{sheet}': {message}")]
    #[diagnostic(code(sheetsync::malformed_sheet))]
    MalformedSheet { sheet: String, message: String },

    #[error("row {index} of sheet '{sheet}' is a {found}, not a row")]
    #[diagnostic(code(sheetsync::malformed_row))]
    MalformedRow {
        sheet: String,
        index: usize,
        found: &'static str,
    },

    #[error("workbook '{path}' is not a list of sheets: {message}")]
    #[diagnostic(code(sheetsync::malformed_workbook))]
    MalformedWorkbook { path: PathBuf, message: String },

    #[error("artifact '{path}' is a {found}, expected a {expected}")]
    #[diagnostic(code(sheetsync::artifact_kind))]
    ArtifactKind {
        path: PathBuf,
        found: &'static str,
        expected: &'static str,
    },

    #[error("failed to read '{path}'")]
    #[diagnostic(code(sheetsync::read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(sheetsync::store))]
    Store(#[from] StoreError),
}

impl ConvertError {
    /// Classify the error.
    pub fn class(&self) -> ErrorClass {
        match self {
            ConvertError::UnknownType { .. }
            | ConvertError::AmbiguousType { .. }
            | ConvertError::MissingType { .. }
            | ConvertError::MissingSource
            | ConvertError::MissingOutput
            | ConvertError::NotLineCapable { .. }
            | ConvertError::MissingKeyField { .. }
            | ConvertError::InvalidSheetName { .. }
            | ConvertError::InvalidKeyPath { .. }
            | ConvertError::NoKeyField => ErrorClass::Configuration,

            ConvertError::Coerce { .. }
            | ConvertError::CoerceField { .. }
            | ConvertError::Process { .. }
            | ConvertError::MalformedSheet { .. }
            | ConvertError::MalformedRow { .. }
            | ConvertError::MalformedWorkbook { .. }
            | ConvertError::ArtifactKind { .. } => ErrorClass::DataFormat,

            ConvertError::Read { .. } | ConvertError::Store(_) => ErrorClass::Io,
        }
    }

    pub(crate) fn coerce(target: &str, found: &'static str, message: impl fmt::Display) -> Self {
        ConvertError::Coerce {
            target: target.to_string(),
            found,
            message: message.to_string(),
        }
    }

    /// Scope a value-level coercion error to a named field.
    pub(crate) fn in_field(self, field: &str) -> Self {
        match self {
            ConvertError::Coerce {
                target,
                found,
                message,
            } => ConvertError::CoerceField {
                field: field.to_string(),
                target,
                found,
                message,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes() {
        assert_eq!(
            ConvertError::UnknownType {
                name: "Weapon".into()
            }
            .class(),
            ErrorClass::Configuration
        );
        assert_eq!(
            ConvertError::coerce("i64", "string", "invalid digit").class(),
            ErrorClass::DataFormat
        );
        assert_eq!(
            ConvertError::Read {
                path: "x.json".into(),
                source: io::Error::from(io::ErrorKind::NotFound),
            }
            .class(),
            ErrorClass::Io
        );
    }

    #[test]
    fn test_ambiguous_message() {
        let err = ConvertError::AmbiguousType {
            name: "Weapon".into(),
            candidates: vec!["a.Weapon".into(), "b.Weapon".into()],
        };
        assert_eq!(
            err.to_string(),
            "type name 'Weapon' is ambiguous, it matches a.Weapon, b.Weapon"
        );
    }

    #[test]
    fn test_in_field() {
        let err = ConvertError::coerce("i64", "string", "invalid digit").in_field("damage");
        assert_eq!(
            err.to_string(),
            "field 'damage': cannot convert string into i64: invalid digit"
        );
    }
}
