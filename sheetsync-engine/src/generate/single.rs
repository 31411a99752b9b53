//! One container artifact per sheet.

use std::path::PathBuf;

use serde_json::Value;
use sheetsync_core::{ArtifactKind, ArtifactStore, StoreError, artifact_path};
use sheetsync_ir::RawSheet;
use tracing::debug;

use crate::{ConversionConfig, Result, TypedContainer, pipeline::SheetOutcome};

/// Records of one sheet, ready to replace its container's items.
#[derive(Debug, Clone)]
pub struct SinglePlan {
    pub path: PathBuf,
    pub key_field: Option<String>,
    /// Converted records, in row order.
    pub items: Vec<Value>,
}

/// Convert every row of a sheet. Rows that fail are left out.
pub(crate) fn plan(
    config: &ConversionConfig,
    sheet: &RawSheet,
    outcome: &mut SheetOutcome,
) -> SinglePlan {
    let schema = &config.schema;
    let mut items = Vec::with_capacity(sheet.rows.len());

    for (index, row) in sheet.rows.iter().enumerate() {
        match schema.coerce(row).and_then(|record| schema.process(record)) {
            Ok(record) => items.push(record),
            Err(e) => outcome.skip_row(index, &e),
        }
    }

    SinglePlan {
        path: artifact_path(&config.output_dir, &config.sheet),
        key_field: config.key_field(),
        items,
    }
}

/// Replace the container's items with the planned records.
///
/// An existing container of the same type is reused. Anything else at the
/// path is replaced.
pub(crate) fn apply(
    config: &ConversionConfig,
    plan: SinglePlan,
    store: &dyn ArtifactStore,
    outcome: &mut SheetOutcome,
) -> Result<()> {
    if store.ensure_dir(&config.output_dir)? {
        debug!("created {}", config.output_dir.display());
    }

    let location = plan.path.display().to_string();
    let type_path = config.schema.path();

    let mut container = match store.load(&plan.path) {
        Ok(Some(artifact)) if artifact.is_instance_of(type_path, ArtifactKind::Container) => {
            match TypedContainer::<Value>::from_artifact(&artifact, &plan.path) {
                Ok(container) => container,
                Err(e) => {
                    outcome.warn(format!("{}, recreating it", e), location.as_str());
                    TypedContainer::new()
                }
            }
        }
        Ok(Some(artifact)) => {
            outcome.warn(
                format!(
                    "replacing {} of type '{}'",
                    artifact.kind, artifact.type_path
                ),
                location.as_str(),
            );
            TypedContainer::new()
        }
        Ok(None) => TypedContainer::new(),
        Err(e @ StoreError::Corrupt { .. }) => {
            outcome.warn(format!("{}, recreating it", e), location.as_str());
            TypedContainer::new()
        }
        Err(e) => return Err(e.into()),
    };

    container.set_key_field(plan.key_field);
    let count = plan.items.len();
    container.replace_items(plan.items);

    let artifact = container.to_artifact(type_path)?.with_sheet(&config.sheet);
    let result = store.write(&plan.path, &artifact)?;

    outcome.counts.record_write(result);
    outcome.counts.processed += count;
    debug!("wrote {} record(s) to {}", count, location);
    Ok(())
}
