//! One record artifact per row.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

use serde_json::Value;
use sheetsync_core::{
    Artifact, ArtifactIdentity, ArtifactKind, ArtifactStore, StoreError, WriteResult,
    artifact_path,
};
use sheetsync_ir::{RawSheet, RawValue};
use tracing::{debug, info};

use crate::{
    ConversionConfig, ConvertError, Result, pipeline::SheetOutcome, reconcile::find_stale,
    schema::Schema,
};

/// The artifact one row converts into.
#[derive(Debug, Clone)]
pub struct RowPlan {
    /// Position of the row in the sheet.
    pub index: usize,
    pub identity: ArtifactIdentity,
    pub path: PathBuf,
    /// Record converted from the row.
    pub record: Value,
    /// Fields the row sets. Only these overwrite an existing artifact.
    pub present: Vec<String>,
}

/// Records of one sheet, one artifact each.
#[derive(Debug, Clone, Default)]
pub struct MultiPlan {
    pub rows: Vec<RowPlan>,
    /// Identities found in the sheet. Artifacts with these identities are
    /// never pruned, even when their row failed to convert.
    pub kept: HashSet<ArtifactIdentity>,
}

/// Extract every row's identity and convert the rows.
///
/// Rows without a key are skipped with a warning. Rows whose identity was
/// already seen overwrite the earlier row's artifact.
pub(crate) fn plan(
    config: &ConversionConfig,
    sheet: &RawSheet,
    outcome: &mut SheetOutcome,
) -> Result<MultiPlan> {
    let key_path = config
        .key_path
        .as_ref()
        .ok_or_else(|| ConvertError::MissingKeyField {
            sheet: config.sheet.clone(),
        })?;
    let schema = &config.schema;

    let mut plan = MultiPlan::default();
    let mut seen: HashMap<ArtifactIdentity, usize> = HashMap::new();

    for (index, row) in sheet.rows.iter().enumerate() {
        let Some(key) = key_path.extract(row) else {
            outcome.skip_row_with_warning(index, format!("no key at '{}'", key_path));
            continue;
        };

        let identity = ArtifactIdentity::sanitize(&key);
        if let Some(previous) = seen.insert(identity.clone(), index) {
            outcome.warn(
                format!(
                    "identity '{}' was already used by row {}, the later row wins",
                    identity, previous
                ),
                format!("row {}", index),
            );
        }
        plan.kept.insert(identity.clone());

        let record = match schema.coerce(row) {
            Ok(record) => record,
            Err(e) => {
                outcome.skip_row(index, &e);
                continue;
            }
        };
        let present = row
            .iter()
            .filter(|(name, value)| !matches!(value, RawValue::Null) && schema.has_field(name))
            .map(|(name, _)| name.to_string())
            .collect();

        plan.rows.push(RowPlan {
            index,
            path: artifact_path(&config.output_dir, identity.as_str()),
            identity,
            record,
            present,
        });
    }

    debug!(
        "sheet '{}': {} row(s) planned for {} identities",
        config.sheet,
        plan.rows.len(),
        plan.kept.len()
    );
    Ok(plan)
}

/// Write every planned row, then prune stale artifacts when configured.
///
/// A row that fails is skipped and the remaining rows are still written.
pub(crate) fn apply(
    config: &ConversionConfig,
    plan: MultiPlan,
    store: &dyn ArtifactStore,
    outcome: &mut SheetOutcome,
) -> Result<()> {
    if store.ensure_dir(&config.output_dir)? {
        debug!("created {}", config.output_dir.display());
    }

    for row in &plan.rows {
        match apply_row(config, row, store, outcome) {
            Ok(result) => {
                outcome.counts.record_write(result);
                outcome.counts.processed += 1;
            }
            Err(e) => outcome.skip_row(row.index, &e),
        }
    }

    if config.prune_stale {
        prune(&config.output_dir, &plan.kept, store, outcome);
    }
    Ok(())
}

fn apply_row(
    config: &ConversionConfig,
    row: &RowPlan,
    store: &dyn ArtifactStore,
    outcome: &mut SheetOutcome,
) -> Result<WriteResult> {
    let schema = &config.schema;

    let record = match load_existing(schema, &row.path, store, outcome)? {
        Some(existing) => match overwrite(schema, existing, &row.record, &row.present) {
            Ok(record) => record,
            Err(e) => {
                outcome.warn(
                    format!("existing content does not fit ({}), replacing it", e),
                    row.identity.as_str(),
                );
                row.record.clone()
            }
        },
        None => row.record.clone(),
    };

    let record = schema.process(record)?;
    let artifact = Artifact::record(schema.path(), record).with_sheet(&config.sheet);
    Ok(store.write(&row.path, &artifact)?)
}

/// Data of the artifact at `path` when it can be reused.
///
/// Artifacts of another type or kind, and unreadable ones, are deleted along
/// with their sidecar so the row starts from a fresh record.
fn load_existing(
    schema: &Schema,
    path: &Path,
    store: &dyn ArtifactStore,
    outcome: &mut SheetOutcome,
) -> Result<Option<Value>> {
    let location = path.display().to_string();

    match store.load(path) {
        Ok(Some(artifact)) if artifact.is_instance_of(schema.path(), ArtifactKind::Record) => {
            Ok(Some(artifact.data))
        }
        Ok(Some(artifact)) => {
            outcome.warn(
                format!(
                    "replacing {} of type '{}'",
                    artifact.kind, artifact.type_path
                ),
                location,
            );
            store.delete(path)?;
            Ok(None)
        }
        Ok(None) => Ok(None),
        Err(e @ StoreError::Corrupt { .. }) => {
            outcome.warn(format!("{}, recreating it", e), location);
            store.delete(path)?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Overwrite the fields a row sets. Other fields keep their previous value.
fn overwrite(schema: &Schema, existing: Value, record: &Value, present: &[String]) -> Result<Value> {
    let (Value::Object(mut fields), Value::Object(values)) = (existing, record) else {
        return Ok(record.clone());
    };

    for name in present {
        if let Some(value) = values.get(name) {
            fields.insert(name.clone(), value.clone());
        }
    }
    schema.normalize(Value::Object(fields))
}

fn prune(
    dir: &Path,
    kept: &HashSet<ArtifactIdentity>,
    store: &dyn ArtifactStore,
    outcome: &mut SheetOutcome,
) {
    let stale = match find_stale(store, dir, kept) {
        Ok(stale) => stale,
        Err(e) => {
            outcome.error(&ConvertError::from(e), dir.display().to_string());
            return;
        }
    };

    for path in stale {
        match store.delete(&path) {
            Ok(true) => {
                info!("deleted stale artifact {}", path.display());
                outcome.counts.deleted += 1;
            }
            Ok(false) => {}
            Err(e) => outcome.error(&ConvertError::from(e), path.display().to_string()),
        }
    }
}
