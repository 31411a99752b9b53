//! Convert command report data structures.

use std::path::{Path, PathBuf};

use sheetsync_engine::{
    EntrySummary,
    pipeline::{Counts, SheetOutcome},
};

use super::output::{Output, Report};

/// Report data from a conversion run.
#[derive(Debug)]
pub struct ConvertReport {
    /// Directory paths are shown relative to.
    pub base_dir: PathBuf,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// One run per conversion entry, in manifest order.
    pub entries: Vec<EntryRun>,
}

/// One conversion entry's run.
#[derive(Debug)]
pub struct EntryRun {
    pub summary: EntrySummary,
    /// Artifacts a dry run would prune, per sheet.
    pub would_prune: Vec<(String, Vec<PathBuf>)>,
}

impl ConvertReport {
    /// Whether any entry, sheet or row failed.
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|e| e.summary.has_errors())
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.base_dir).unwrap_or(path)
    }

    fn sheet_line(&self, sheet: &SheetOutcome) -> String {
        let mut line = format!("{}: {}", sheet.sheet, sheet.status);
        if let Some(schema) = &sheet.schema {
            line.push_str(&format!(" as {}", schema));
        }
        if let Some(mode) = sheet.mode {
            line.push_str(&format!(" ({})", mode));
        }
        if let Some(dir) = &sheet.output_dir {
            line.push_str(&format!(" -> {}", self.relative(dir).display()));
        }
        line
    }
}

fn counts_line(counts: &Counts) -> String {
    format!(
        "{} rows: {} processed, {} skipped, {} created, {} updated, {} deleted",
        counts.rows,
        counts.processed,
        counts.skipped,
        counts.created,
        counts.updated,
        counts.deleted
    )
}

impl Report for ConvertReport {
    fn render(&self, out: &mut dyn Output) {
        if self.entries.is_empty() {
            out.preformatted("No [[convert]] entries to run.");
            return;
        }

        let mut totals = Counts::default();
        let mut sheets = 0;
        let mut converted = 0;

        for entry in &self.entries {
            let summary = &entry.summary;
            out.section(&summary.source);

            for diagnostic in &summary.diagnostics {
                out.list_item(&diagnostic.to_string());
            }

            for sheet in &summary.sheets {
                out.list_item(&self.sheet_line(sheet));
                if sheet.counts.rows > 0 {
                    out.preformatted(&format!("    {}", counts_line(&sheet.counts)));
                }
                for diagnostic in &sheet.diagnostics {
                    out.preformatted(&format!("    {}", diagnostic));
                }
            }

            for (sheet, paths) in &entry.would_prune {
                for path in paths {
                    out.removed_item(&format!(
                        "{} (stale in {})",
                        self.relative(path).display(),
                        sheet
                    ));
                }
            }

            totals += summary.totals();
            sheets += summary.sheets.len();
            converted += summary.converted();
            out.newline();
        }

        if self.dry_run {
            out.preformatted("Dry run, nothing was written.");
        }
        out.preformatted(&format!(
            "{}/{} sheets converted, {}",
            converted,
            sheets,
            counts_line(&totals)
        ));
    }
}
