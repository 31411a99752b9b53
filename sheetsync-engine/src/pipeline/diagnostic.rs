//! Diagnostics collected while converting.
//!
//! Every problem a run recovers from is both logged and kept as a
//! [`Diagnostic`] on the outcome of the sheet (or entry) it concerns, so the
//! completion summary can report it.

use std::fmt;

use serde::Serialize;

use crate::{ConvertError, ErrorClass};

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A row, sheet or artifact operation was abandoned.
    Error,
    /// Something was skipped or recovered from.
    Warning,
    Info,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A diagnostic message from a conversion run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Error class, set for errors.
    pub class: Option<ErrorClass>,
    pub message: String,
    /// Where the problem was found (e.g., "row 3", "Sword.json").
    pub location: Option<String>,
}

impl Diagnostic {
    pub fn error(class: ErrorClass, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            class: Some(class),
            message: message.into(),
            location: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            class: None,
            message: message.into(),
            location: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            class: None,
            message: message.into(),
            location: None,
        }
    }

    /// Add a location to this diagnostic.
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl From<&ConvertError> for Diagnostic {
    fn from(err: &ConvertError) -> Self {
        Diagnostic::error(err.class(), err.to_string())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(class) = self.class {
            write!(f, " ({})", class)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " (at {})", loc)?;
        }
        Ok(())
    }
}
