//! Convert operation - run the manifest's conversion entries.

use std::path::Path;

use eyre::{Result, bail};
use sheetsync_core::FsStore;
use sheetsync_engine::{Converter, SchemaRegistry};
use sheetsync_manifest::{ConvertEntry, Manifest};
use tracing::info;

use crate::reports::{ConvertReport, EntryRun};

/// Options for the convert operation.
#[derive(Debug, Default)]
pub struct ConvertOptions<'a> {
    /// Only run the entries reading this source.
    pub only: Option<&'a str>,
    /// Prune stale artifacts even when the manifest does not.
    pub prune: bool,
    /// Plan every entry without writing anything.
    pub dry_run: bool,
}

/// Execute the convert operation.
///
/// Entries run in manifest order. A failing entry or sheet is recorded in the
/// report and the run moves on.
pub fn convert(
    manifest: &Manifest,
    base_dir: &Path,
    options: ConvertOptions<'_>,
) -> Result<ConvertReport> {
    let entries: Vec<&ConvertEntry> = match options.only {
        Some(source) => manifest.entries_for(source).collect(),
        None => manifest.convert.iter().collect(),
    };
    if let Some(source) = options.only {
        if entries.is_empty() {
            bail!("no [[convert]] entry reads '{}'", source);
        }
    }

    let registry = SchemaRegistry::from_manifest(manifest);
    let prune_stale = manifest.settings.prune_stale || options.prune;
    let converter = Converter::new(&registry, base_dir).with_prune_stale(prune_stale);
    let store = FsStore::new();

    let mut runs = Vec::with_capacity(entries.len());
    for entry in entries {
        info!("converting '{}'", entry.source);
        let run = if options.dry_run {
            let plan = converter.plan(entry);
            EntryRun {
                would_prune: plan.would_prune(&store),
                summary: plan.summary(),
            }
        } else {
            EntryRun {
                summary: converter.run(entry, &store),
                would_prune: Vec::new(),
            }
        };
        runs.push(run);
    }

    Ok(ConvertReport {
        base_dir: base_dir.to_path_buf(),
        dry_run: options.dry_run,
        entries: runs,
    })
}
