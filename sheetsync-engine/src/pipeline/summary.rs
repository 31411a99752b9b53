//! Conversion outcomes.

use std::{fmt, ops::AddAssign, path::PathBuf};

use serde::Serialize;
use sheetsync_core::WriteResult;
use tracing::{error, info, warn};

use super::{Diagnostic, Severity};
use crate::{ConvertError, GenerationMode};

/// Row and artifact counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    /// Rows in the source.
    pub rows: usize,
    /// Rows that made it into an artifact.
    pub processed: usize,
    /// Rows left out for any reason.
    pub skipped: usize,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl Counts {
    pub(crate) fn record_write(&mut self, result: WriteResult) {
        match result {
            WriteResult::Created => self.created += 1,
            WriteResult::Updated => self.updated += 1,
        }
    }
}

impl AddAssign for Counts {
    fn add_assign(&mut self, other: Self) {
        self.rows += other.rows;
        self.processed += other.processed;
        self.skipped += other.skipped;
        self.created += other.created;
        self.updated += other.updated;
        self.deleted += other.deleted;
    }
}

/// What happened to a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetStatus {
    /// The sheet was converted. Individual rows may still have failed.
    Converted,
    /// The sheet has no rows. Nothing was written.
    Empty,
    /// The sheet could not be converted at all.
    Skipped,
}

impl fmt::Display for SheetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetStatus::Converted => write!(f, "converted"),
            SheetStatus::Empty => write!(f, "empty"),
            SheetStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Outcome of converting one sheet.
#[derive(Debug, Clone, Serialize)]
pub struct SheetOutcome {
    pub sheet: String,
    pub status: SheetStatus,
    pub mode: Option<GenerationMode>,
    /// Full path of the resolved schema.
    pub schema: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub counts: Counts,
    pub diagnostics: Vec<Diagnostic>,
}

impl SheetOutcome {
    pub(crate) fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            status: SheetStatus::Converted,
            mode: None,
            schema: None,
            output_dir: None,
            counts: Counts::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Give up on the whole sheet.
    pub(crate) fn skip(&mut self, err: &ConvertError) {
        error!("sheet '{}' skipped: {}", self.sheet, err);
        self.status = SheetStatus::Skipped;
        self.counts.skipped = self.counts.rows.saturating_sub(self.counts.processed);
        self.diagnostics.push(Diagnostic::from(err));
    }

    /// Leave a row out.
    pub(crate) fn skip_row(&mut self, index: usize, err: &ConvertError) {
        error!("sheet '{}', row {}: {}", self.sheet, index, err);
        self.counts.skipped += 1;
        self.diagnostics
            .push(Diagnostic::from(err).at(format!("row {}", index)));
    }

    /// Leave a row out without it being an error.
    pub(crate) fn skip_row_with_warning(&mut self, index: usize, message: String) {
        warn!("sheet '{}', row {}: {}", self.sheet, index, message);
        self.counts.skipped += 1;
        self.diagnostics
            .push(Diagnostic::warning(message).at(format!("row {}", index)));
    }

    /// Record an error that does not affect row counts.
    pub(crate) fn error(&mut self, err: &ConvertError, location: impl Into<String>) {
        let location = location.into();
        error!("sheet '{}' ({}): {}", self.sheet, location, err);
        self.diagnostics.push(Diagnostic::from(err).at(location));
    }

    pub(crate) fn warn(&mut self, message: String, location: impl Into<String>) {
        let location = location.into();
        warn!("sheet '{}' ({}): {}", self.sheet, location, message);
        self.diagnostics
            .push(Diagnostic::warning(message).at(location));
    }

    pub(crate) fn info(&mut self, message: String) {
        info!("sheet '{}': {}", self.sheet, message);
        self.diagnostics.push(Diagnostic::info(message));
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Outcome of running one conversion entry.
#[derive(Debug, Clone, Serialize)]
pub struct EntrySummary {
    pub source: String,
    pub sheets: Vec<SheetOutcome>,
    /// Problems with the entry itself rather than one of its sheets.
    pub diagnostics: Vec<Diagnostic>,
}

impl EntrySummary {
    /// Counts summed over every sheet.
    pub fn totals(&self) -> Counts {
        let mut totals = Counts::default();
        for sheet in &self.sheets {
            totals += sheet.counts;
        }
        totals
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
            || self.sheets.iter().any(SheetOutcome::has_errors)
    }

    /// Sheets that were converted.
    pub fn converted(&self) -> usize {
        self.sheets
            .iter()
            .filter(|s| s.status == SheetStatus::Converted)
            .count()
    }
}
