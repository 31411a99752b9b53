//! Shared fixtures for the engine integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sheetsync_core::{ArtifactStore, FsStore, artifact_path};
use sheetsync_engine::{
    Converter, EntrySummary, LineRecord, Record, SchemaRegistry, TypedContainer, Workbook,
    field_access,
};
use sheetsync_ir::{RawRow, RawSheet};
use sheetsync_manifest::ConvertEntry;
use tempfile::TempDir;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: String,
    pub damage: i64,
    pub note: String,
}

field_access!(Weapon { id, damage, note });

impl Record for Weapon {
    const TYPE_PATH: &'static str = "items.Weapon";
}

impl LineRecord for Weapon {
    fn process(&mut self) -> eyre::Result<()> {
        if self.damage < 0 {
            eyre::bail!("damage of '{}' is negative", self.id);
        }
        Ok(())
    }
}

/// A record without the per-row capability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub name: String,
    pub value: String,
}

field_access!(Setting { name, value });

impl Record for Setting {
    const TYPE_PATH: &'static str = "config.Setting";
}

pub fn registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry.register_line::<Weapon>().register::<Setting>();
    registry
}

pub fn weapon(id: &str, damage: i64) -> Weapon {
    Weapon {
        id: id.into(),
        damage,
        note: String::new(),
    }
}

pub fn row(id: &str, damage: i64) -> RawRow {
    RawRow::new().with("id", id).with("damage", damage)
}

pub fn single_file(type_name: &str) -> ConvertEntry {
    ConvertEntry {
        source: "book.json".into(),
        output: "out".into(),
        type_name: type_name.into(),
        key: "id".into(),
        multi_file: false,
        child_folder: false,
    }
}

pub fn multi_file(type_name: &str) -> ConvertEntry {
    ConvertEntry {
        multi_file: true,
        ..single_file(type_name)
    }
}

/// Plan and apply in-memory sheets against a temp directory.
pub fn run(
    temp: &TempDir,
    registry: &SchemaRegistry,
    entry: &ConvertEntry,
    prune_stale: bool,
    sheets: Vec<RawSheet>,
) -> EntrySummary {
    Converter::new(registry, temp.path())
        .with_prune_stale(prune_stale)
        .plan_workbook(entry, Workbook::from_sheets("book.json", sheets))
        .apply(&FsStore::new())
}

pub fn out_dir(temp: &TempDir) -> PathBuf {
    temp.path().join("out")
}

pub fn out_path(temp: &TempDir, stem: &str) -> PathBuf {
    artifact_path(&out_dir(temp), stem)
}

pub fn load_container(path: &Path) -> TypedContainer<Weapon> {
    let artifact = FsStore::new()
        .load(path)
        .expect("Failed to load artifact")
        .expect("Artifact does not exist");
    TypedContainer::from_artifact(&artifact, path).expect("Artifact is not a container")
}

pub fn load_record(path: &Path) -> Weapon {
    let artifact = FsStore::new()
        .load(path)
        .expect("Failed to load artifact")
        .expect("Artifact does not exist");
    serde_json::from_value(artifact.data).expect("Artifact is not a weapon")
}

/// File stems of the artifacts in a directory.
pub fn stems(dir: &Path) -> Vec<String> {
    FsStore::new()
        .list(dir)
        .expect("Failed to list artifacts")
        .iter()
        .filter_map(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .collect()
}
