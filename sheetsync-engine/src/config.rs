//! Per-sheet conversion settings.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Serialize;
use sheetsync_core::ArtifactIdentity;
use sheetsync_ir::RawSheet;
use sheetsync_manifest::ConvertEntry;
use tracing::debug;

use crate::{ConvertError, KeyPath, Result, SchemaRegistry, schema::Schema};

/// How a sheet's rows map onto artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    /// One container artifact per sheet.
    SingleFile,
    /// One record artifact per row.
    MultiFile,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::SingleFile => "single-file",
            GenerationMode::MultiFile => "multi-file",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved settings for converting one sheet.
///
/// A config only exists once its type has resolved and its output directory
/// is known, so every config handed to a generator is usable. Multi-file
/// configs additionally hold a line-capable schema and a key path.
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    pub sheet: String,
    /// Type name as configured, before resolution.
    pub type_name: String,
    pub schema: Arc<Schema>,
    pub key_path: Option<KeyPath>,
    pub mode: GenerationMode,
    /// Effective output directory, including the per-sheet folder.
    pub output_dir: PathBuf,
    pub prune_stale: bool,
}

impl ConversionConfig {
    /// Build the config of one sheet of a conversion entry.
    ///
    /// The type name and key path come from the entry. When the entry leaves
    /// them empty, the sheet's embedded `className` and `keyName` are used.
    pub fn build(
        entry: &ConvertEntry,
        sheet: &RawSheet,
        base_dir: &Path,
        registry: &SchemaRegistry,
        prune_stale: bool,
    ) -> Result<Self> {
        if entry.output.trim().is_empty() {
            return Err(ConvertError::MissingOutput);
        }
        if !ArtifactIdentity::is_valid(&sheet.name) {
            return Err(ConvertError::InvalidSheetName {
                sheet: sheet.name.clone(),
            });
        }

        let type_name = non_empty(&entry.type_name)
            .or_else(|| sheet.class_name.as_deref().and_then(non_empty))
            .ok_or_else(|| ConvertError::MissingType {
                sheet: sheet.name.clone(),
            })?;
        let schema = registry.resolve(type_name)?;

        let key_path = non_empty(&entry.key)
            .or_else(|| sheet.key_name.as_deref().and_then(non_empty))
            .map(KeyPath::parse)
            .transpose()?;

        let mode = if entry.multi_file {
            GenerationMode::MultiFile
        } else {
            GenerationMode::SingleFile
        };

        if mode == GenerationMode::MultiFile {
            if !schema.is_line() {
                return Err(ConvertError::NotLineCapable {
                    schema: schema.path().to_string(),
                });
            }
            if key_path.is_none() {
                return Err(ConvertError::MissingKeyField {
                    sheet: sheet.name.clone(),
                });
            }
        }

        let mut output_dir = entry.output_path(base_dir);
        if entry.multi_file && entry.child_folder {
            output_dir.push(&sheet.name);
        }

        debug!(
            "sheet '{}': {} as {} into {}",
            sheet.name,
            mode,
            schema.path(),
            output_dir.display()
        );

        Ok(Self {
            sheet: sheet.name.clone(),
            type_name: type_name.to_string(),
            schema,
            key_path,
            mode,
            output_dir,
            prune_stale,
        })
    }

    /// Key field name of a single-file container.
    pub fn key_field(&self) -> Option<String> {
        self.key_path.as_ref().map(KeyPath::to_string)
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}
