//! Two-phase conversion pipeline.
//!
//! A run converts one `[[convert]]` entry in two phases:
//!
//! - **plan** reads the workbook, builds each sheet's config and converts
//!   every row in memory. Nothing is written.
//! - **apply** takes the plan to an [`ArtifactStore`] and creates, updates
//!   and prunes artifacts.
//!
//! All rows of an entry are converted before its first artifact is touched.
//! Problems are caught at the smallest unit they concern (row, sheet, entry),
//! logged once and kept as [`Diagnostic`]s on the [`EntrySummary`].
//!
//! # Example
//!
//! ```ignore
//! let converter = Converter::new(&registry, manifest.base_dir());
//! let summary = converter.run(&entry, &FsStore::new());
//!
//! let totals = summary.totals();
//! println!("{}/{} rows converted", totals.processed, totals.rows);
//! ```

mod diagnostic;
mod summary;

use std::path::{Path, PathBuf};

use sheetsync_core::ArtifactStore;
use sheetsync_manifest::ConvertEntry;
use tracing::{error, info, warn};

pub use diagnostic::{Diagnostic, Severity};
pub use summary::{Counts, EntrySummary, SheetOutcome, SheetStatus};

use crate::{
    ConversionConfig, ConvertError, GenerationMode, SchemaRegistry,
    generate::{MultiPlan, SinglePlan, multi, single},
    reconcile::find_stale,
    source::{SheetEntry, SourceSheet, Workbook},
};

/// Plans and runs conversion entries against a schema registry.
#[derive(Debug, Clone)]
pub struct Converter<'a> {
    registry: &'a SchemaRegistry,
    /// Directory relative entry paths resolve against.
    base_dir: PathBuf,
    prune_stale: bool,
}

impl<'a> Converter<'a> {
    pub fn new(registry: &'a SchemaRegistry, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            base_dir: base_dir.into(),
            prune_stale: false,
        }
    }

    /// Delete artifacts whose row is gone from the source (multi-file only).
    pub fn with_prune_stale(mut self, prune_stale: bool) -> Self {
        self.prune_stale = prune_stale;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Phase 1: read an entry's workbook and convert its rows.
    pub fn plan(&self, entry: &ConvertEntry) -> EntryPlan {
        let mut plan = EntryPlan::new(&entry.source);

        if entry.source.trim().is_empty() {
            plan.fail(&ConvertError::MissingSource);
            return plan;
        }
        if entry.output.trim().is_empty() {
            plan.fail(&ConvertError::MissingOutput);
            return plan;
        }

        match Workbook::read(&entry.source_path(&self.base_dir)) {
            Ok(workbook) => self.plan_workbook(entry, workbook),
            Err(e) => {
                plan.fail(&e);
                plan
            }
        }
    }

    /// Phase 1 for an already read workbook.
    pub fn plan_workbook(&self, entry: &ConvertEntry, workbook: Workbook) -> EntryPlan {
        let mut plan = EntryPlan::new(&entry.source);

        if workbook.skipped_entries > 0 {
            let message = format!(
                "skipped {} workbook entries without a sheet name",
                workbook.skipped_entries
            );
            warn!("{}: {}", plan.source, message);
            plan.diagnostics.push(Diagnostic::warning(message));
        }

        for sheet in workbook.sheets {
            plan.sheets.push(match sheet {
                SheetEntry::Read(source) => self.plan_sheet(entry, source),
                SheetEntry::Malformed { name, error } => {
                    let mut outcome = SheetOutcome::new(name);
                    outcome.skip(&error);
                    SheetPlan::done(outcome)
                }
            });
        }
        plan
    }

    fn plan_sheet(&self, entry: &ConvertEntry, source: SourceSheet) -> SheetPlan {
        let mut outcome = SheetOutcome::new(&source.sheet.name);
        outcome.counts.rows = source.total_rows();

        // Rows the reader left out
        outcome.counts.skipped += source.empty_rows;
        for error in &source.rejected {
            outcome.counts.skipped += 1;
            outcome.error(error, "row list");
        }

        let config = match ConversionConfig::build(
            entry,
            &source.sheet,
            &self.base_dir,
            self.registry,
            self.prune_stale,
        ) {
            Ok(config) => config,
            Err(e) => {
                outcome.skip(&e);
                return SheetPlan::done(outcome);
            }
        };
        outcome.mode = Some(config.mode);
        outcome.schema = Some(config.schema.path().to_string());
        outcome.output_dir = Some(config.output_dir.clone());

        if outcome.counts.rows == 0 {
            outcome.status = SheetStatus::Empty;
            outcome.info("no rows, nothing to convert".to_string());
            return SheetPlan::done(outcome);
        }

        let work = match config.mode {
            GenerationMode::SingleFile => {
                SheetWork::Single(single::plan(&config, &source.sheet, &mut outcome))
            }
            GenerationMode::MultiFile => match multi::plan(&config, &source.sheet, &mut outcome) {
                Ok(plan) => SheetWork::Multi(plan),
                Err(e) => {
                    outcome.skip(&e);
                    return SheetPlan::done(outcome);
                }
            },
        };

        SheetPlan {
            config: Some(config),
            work,
            outcome,
        }
    }

    /// Plan and apply an entry.
    pub fn run(&self, entry: &ConvertEntry, store: &dyn ArtifactStore) -> EntrySummary {
        self.plan(entry).apply(store)
    }
}

/// Phase-1 result of one conversion entry.
#[derive(Debug)]
pub struct EntryPlan {
    pub source: String,
    pub sheets: Vec<SheetPlan>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Phase-1 result of one sheet.
#[derive(Debug)]
pub struct SheetPlan {
    /// Set when the sheet has work to apply.
    pub config: Option<ConversionConfig>,
    pub work: SheetWork,
    /// Outcome so far. Applying completes it.
    pub outcome: SheetOutcome,
}

/// What applying a sheet does.
#[derive(Debug)]
pub enum SheetWork {
    Single(SinglePlan),
    Multi(MultiPlan),
    Nothing,
}

impl SheetPlan {
    fn done(outcome: SheetOutcome) -> Self {
        Self {
            config: None,
            work: SheetWork::Nothing,
            outcome,
        }
    }

    /// Artifacts applying this sheet would prune.
    pub fn would_prune(&self, store: &dyn ArtifactStore) -> Result<Vec<PathBuf>, ConvertError> {
        match (&self.config, &self.work) {
            (Some(config), SheetWork::Multi(plan)) if config.prune_stale => {
                Ok(find_stale(store, &config.output_dir, &plan.kept)?)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Phase 2 for one sheet.
    pub fn apply(self, store: &dyn ArtifactStore) -> SheetOutcome {
        let mut outcome = self.outcome;
        let Some(config) = self.config else {
            return outcome;
        };

        let result = match self.work {
            SheetWork::Single(plan) => single::apply(&config, plan, store, &mut outcome),
            SheetWork::Multi(plan) => multi::apply(&config, plan, store, &mut outcome),
            SheetWork::Nothing => Ok(()),
        };
        if let Err(e) = result {
            outcome.skip(&e);
        }

        let counts = outcome.counts;
        info!(
            "sheet '{}': {}/{} row(s), {} created, {} updated, {} deleted",
            outcome.sheet,
            counts.processed,
            counts.rows,
            counts.created,
            counts.updated,
            counts.deleted
        );
        outcome
    }
}

impl EntryPlan {
    fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            sheets: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn fail(&mut self, err: &ConvertError) {
        error!("entry '{}' skipped: {}", self.source, err);
        self.diagnostics.push(Diagnostic::from(err));
    }

    /// Artifacts applying this plan would prune, per sheet. Read-only.
    pub fn would_prune(&self, store: &dyn ArtifactStore) -> Vec<(String, Vec<PathBuf>)> {
        let mut result = Vec::new();
        for sheet in &self.sheets {
            match sheet.would_prune(store) {
                Ok(paths) if paths.is_empty() => {}
                Ok(paths) => result.push((sheet.outcome.sheet.clone(), paths)),
                Err(e) => warn!("sheet '{}': {}", sheet.outcome.sheet, e),
            }
        }
        result
    }

    /// Outcomes as they stand after planning, without applying anything.
    pub fn summary(&self) -> EntrySummary {
        EntrySummary {
            source: self.source.clone(),
            sheets: self.sheets.iter().map(|s| s.outcome.clone()).collect(),
            diagnostics: self.diagnostics.clone(),
        }
    }

    /// Phase 2: apply every sheet in order.
    pub fn apply(self, store: &dyn ArtifactStore) -> EntrySummary {
        EntrySummary {
            source: self.source,
            sheets: self
                .sheets
                .into_iter()
                .map(|sheet| sheet.apply(store))
                .collect(),
            diagnostics: self.diagnostics,
        }
    }
}
