//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from manifest validation.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    /// Number of registered schemas.
    pub schemas: usize,
    /// Number of conversion entries.
    pub entries: usize,
    /// Error messages.
    pub errors: Vec<String>,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Info messages.
    pub infos: Vec<String>,
}

impl CheckReport {
    /// Whether the check passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for error in &self.errors {
            out.error(error);
        }

        for warning in &self.warnings {
            out.warning(warning);
        }

        for info in &self.infos {
            out.preformatted(&format!("info: {}", info));
        }

        if self.is_valid() {
            if !self.warnings.is_empty() || !self.infos.is_empty() {
                out.newline();
            }
            out.preformatted(&format!("✓ {} is valid", self.config_path.display()));
            out.key_value_indented("schemas", &self.schemas.to_string());
            out.key_value_indented("entries", &self.entries.to_string());
        }
    }
}
