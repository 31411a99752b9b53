//! End-to-end runs from `sheetsync.toml` and a workbook dump on disk.

mod common;

use std::fs;

use common::*;
use serde_json::json;
use sheetsync_core::{ArtifactStore, FsStore, artifact_path};
use sheetsync_engine::{
    Converter, ErrorClass, SchemaRegistry, TypedContainer,
    pipeline::{SheetStatus, Severity},
};
use sheetsync_manifest::{DEFAULT_FILENAME, SheetsyncToml};
use tempfile::TempDir;

const MANIFEST: &str = r#"
[settings]
prune_stale = true

[schemas."mobs.Monster"]
line = true
required = ["id"]

[schemas."mobs.Monster".fields]
id = "string"
hp = "int"
speed = "float"
boss = "bool"

[schemas."loot.Drop".fields]
item = "string"
weight = "int"

[[convert]]
source = "data/monsters.json"
output = "generated/monsters"
type = "Monster"
key = "id"
multi_file = true
child_folder = true

[[convert]]
source = "data/drops.json"
output = "generated"
type = "Drop"
key = "item"
"#;

const MONSTERS: &str = r#"[
    {"sheetName": "Slimes", "dataList": [
        {"id": "green", "hp": 3, "speed": "1.5"},
        {"id": "king", "hp": 40, "boss": true},
        null,
        7,
        {"id": "", "hp": 1},
        {"hp": 2}
    ]},
    {"sheetName": "Broken", "dataList": "oops"},
    {"dataList": []}
]"#;

const DROPS: &str = r#"[
    {"sheetName": "Drops", "dataList": [
        {"item": "gel", "weight": 10},
        {"item": "crown", "weight": "1"}
    ]}
]"#;

fn project() -> (TempDir, SheetsyncToml) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let data = temp.path().join("data");
    fs::create_dir_all(&data).expect("Failed to create data dir");
    fs::write(data.join("monsters.json"), MONSTERS).expect("Failed to write monsters");
    fs::write(data.join("drops.json"), DROPS).expect("Failed to write drops");

    let manifest_path = temp.path().join(DEFAULT_FILENAME);
    fs::write(&manifest_path, MANIFEST).expect("Failed to write manifest");
    let toml = SheetsyncToml::open(&manifest_path).expect("Failed to open manifest");
    (temp, toml)
}

#[test]
fn test_run_from_manifest() {
    let (temp, toml) = project();
    let manifest = toml.manifest();
    let registry = SchemaRegistry::from_manifest(manifest);
    let converter =
        Converter::new(&registry, toml.base_dir()).with_prune_stale(manifest.settings.prune_stale);
    let store = FsStore::new();

    let monsters = converter.run(&manifest.convert[0], &store);

    assert_eq!(monsters.sheets.len(), 2);
    assert_eq!(monsters.diagnostics.len(), 1);
    assert_eq!(monsters.diagnostics[0].severity, Severity::Warning);

    let slimes = &monsters.sheets[0];
    assert_eq!(slimes.status, SheetStatus::Converted);
    assert_eq!(slimes.counts.rows, 6);
    assert_eq!(slimes.counts.processed, 2);
    assert_eq!(slimes.counts.skipped, 4);

    let broken = &monsters.sheets[1];
    assert_eq!(broken.status, SheetStatus::Skipped);
    assert_eq!(broken.diagnostics[0].class, Some(ErrorClass::DataFormat));

    let dir = temp.path().join("generated/monsters/Slimes");
    let green = store
        .load(&artifact_path(&dir, "green"))
        .expect("Failed to load artifact")
        .expect("Artifact does not exist");
    assert_eq!(green.type_path, "mobs.Monster");
    assert_eq!(green.sheet.as_deref(), Some("Slimes"));
    assert_eq!(
        green.data,
        json!({"id": "green", "hp": 3, "speed": 1.5, "boss": false})
    );
    assert_eq!(stems(&dir).len(), 2);

    let drops = converter.run(&manifest.convert[1], &store);
    assert!(!drops.has_errors());

    let artifact = store
        .load(&temp.path().join("generated/Drops.json"))
        .expect("Failed to load artifact")
        .expect("Artifact does not exist");
    let container = TypedContainer::<serde_json::Value>::from_artifact(
        &artifact,
        &temp.path().join("generated/Drops.json"),
    )
    .expect("Artifact is not a container");
    assert_eq!(container.key_field(), Some("item"));
    assert_eq!(
        container.get_by_key("crown"),
        Some(&json!({"item": "crown", "weight": 1}))
    );
}

/// The required-field hook rejects the row with an empty key value.
#[test]
fn test_required_field_rejects_row() {
    let (_temp, toml) = project();
    let manifest = toml.manifest();
    let registry = SchemaRegistry::from_manifest(manifest);

    let summary = Converter::new(&registry, toml.base_dir())
        .run(&manifest.convert[0], &FsStore::new());

    let slimes = &summary.sheets[0];
    assert!(
        slimes
            .diagnostics
            .iter()
            .any(|d| d.message.contains("required field 'id' is empty"))
    );
}

#[test]
fn test_missing_source_is_an_entry_error() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let registry = registry();
    let converter = Converter::new(&registry, temp.path());

    let mut entry = single_file("Weapon");
    entry.source = "missing.json".into();
    let summary = converter.run(&entry, &FsStore::new());

    assert!(summary.sheets.is_empty());
    assert_eq!(summary.diagnostics[0].class, Some(ErrorClass::Io));

    entry.source.clear();
    let summary = converter.run(&entry, &FsStore::new());
    assert_eq!(summary.diagnostics[0].class, Some(ErrorClass::Configuration));
}

/// Planning converts every row before anything is written.
#[test]
fn test_plan_writes_nothing() {
    let (temp, toml) = project();
    let manifest = toml.manifest();
    let registry = SchemaRegistry::from_manifest(manifest);

    let plan = Converter::new(&registry, toml.base_dir()).plan(&manifest.convert[1]);
    let summary = plan.summary();

    assert_eq!(summary.sheets[0].counts.rows, 2);
    assert!(!temp.path().join("generated").exists());

    let applied = plan.apply(&FsStore::new());
    assert_eq!(applied.totals().processed, 2);
    assert!(temp.path().join("generated/Drops.json").exists());
}
