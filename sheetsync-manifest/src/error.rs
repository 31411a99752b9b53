use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for manifest operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Encapsulates the source content and filename, reducing parameter passing
/// in error factory functions.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create a parse error from a toml error.
    pub fn parse_error(&self, source: toml::de::Error) -> Box<Error> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            src: self.named_source(),
            span,
            source,
        })
    }

    /// Create a validation error, optionally pointing at a span.
    pub fn validation_error(
        &self,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::Validation {
            src: self.named_source(),
            span,
            message: message.into(),
        })
    }

    pub fn invalid_schema_path_error(
        &self,
        path: impl Into<String>,
        reason: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::InvalidSchemaPath {
            src: self.named_source(),
            span,
            path: path.into(),
            reason: reason.into(),
        })
    }

    pub fn undeclared_field_error(
        &self,
        schema: impl Into<String>,
        field: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::UndeclaredField {
            src: self.named_source(),
            span,
            schema: schema.into(),
            field: field.into(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(
        code(sheetsync::manifest_missing),
        help("create a sheetsync.toml or point to one with --config")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sheetsync.toml")]
    #[diagnostic(code(sheetsync::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid schema path '{path}'")]
    #[diagnostic(
        code(sheetsync::invalid_schema_path),
        help("{reason}. Use dot-separated segments such as \"items.Weapon\".")
    )]
    InvalidSchemaPath {
        #[source_code]
        src: NamedSource<String>,
        #[label("declared here")]
        span: Option<SourceSpan>,
        path: String,
        reason: String,
    },

    #[error("required field '{field}' is not declared by schema '{schema}'")]
    #[diagnostic(
        code(sheetsync::undeclared_field),
        help("add '{field}' under [schemas.\"{schema}\".fields] or remove it from `required`")
    )]
    UndeclaredField {
        #[source_code]
        src: NamedSource<String>,
        #[label("not a declared field")]
        span: Option<SourceSpan>,
        schema: String,
        field: String,
    },

    #[error("{message}")]
    #[diagnostic(code(sheetsync::validation_error))]
    Validation {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },
}
