//! Single-file generation: one container artifact per sheet.

mod common;

use common::*;
use sheetsync_core::{Artifact, ArtifactStore, FsStore};
use sheetsync_engine::pipeline::SheetStatus;
use sheetsync_ir::{RawRow, RawSheet};
use tempfile::TempDir;

/// Running twice on the same source yields the same container.
#[test]
fn test_generation_is_idempotent() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let registry = registry();
    let sheet = || RawSheet::new("Weapons", vec![row("sword", 12), row("axe", 7)]);

    let first = run(&temp, &registry, &single_file("Weapon"), false, vec![sheet()]);
    let before = load_container(&out_path(&temp, "Weapons"));

    let second = run(&temp, &registry, &single_file("Weapon"), false, vec![sheet()]);
    let after = load_container(&out_path(&temp, "Weapons"));

    assert_eq!(first.totals().created, 1);
    assert_eq!(second.totals().updated, 1);
    assert_eq!(before.items(), after.items());
    assert_eq!(after.items(), &[weapon("sword", 12), weapon("axe", 7)]);
    assert_eq!(after.key_field(), Some("id"));
    assert_eq!(before.key_field(), after.key_field());
}

/// Rows gone from the source are gone from the container.
#[test]
fn test_items_are_fully_replaced() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let registry = registry();

    run(
        &temp,
        &registry,
        &single_file("Weapon"),
        false,
        vec![RawSheet::new(
            "Weapons",
            vec![row("sword", 12), row("axe", 7), row("bow", 4)],
        )],
    );
    run(
        &temp,
        &registry,
        &single_file("Weapon"),
        false,
        vec![RawSheet::new("Weapons", vec![row("bow", 5), row("sword", 12)])],
    );

    let container = load_container(&out_path(&temp, "Weapons"));
    assert_eq!(container.items(), &[weapon("bow", 5), weapon("sword", 12)]);
    assert!(container.get_by_key("axe").is_none());
    assert_eq!(container.get_by_key("bow"), Some(&weapon("bow", 5)));
}

/// Duplicate keys stay in the items, lookups find the first.
#[test]
fn test_duplicate_keys_resolve_to_first_item() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    run(
        &temp,
        &registry(),
        &single_file("Weapon"),
        false,
        vec![RawSheet::new(
            "Weapons",
            vec![row("K1", 1), row("K1", 2), row("K2", 3)],
        )],
    );

    let container = load_container(&out_path(&temp, "Weapons"));
    assert_eq!(container.count(), 3);
    assert_eq!(container.get_by_key("K1"), Some(&weapon("K1", 1)));
    assert_eq!(container.get(1), Some(&weapon("K1", 2)));
}

/// Rows that fail to convert are left out, the rest are written.
#[test]
fn test_bad_rows_are_skipped() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    let summary = run(
        &temp,
        &registry(),
        &single_file("Weapon"),
        false,
        vec![RawSheet::new(
            "Weapons",
            vec![
                row("sword", 12),
                RawRow::new().with("id", "axe").with("damage", "heavy"),
                row("club", -1),
            ],
        )],
    );

    let totals = summary.totals();
    assert_eq!(totals.rows, 3);
    assert_eq!(totals.processed, 1);
    assert_eq!(totals.skipped, 2);
    assert_eq!(summary.sheets[0].status, SheetStatus::Converted);
    assert_eq!(
        load_container(&out_path(&temp, "Weapons")).items(),
        &[weapon("sword", 12)]
    );
}

/// An empty sheet writes nothing.
#[test]
fn test_empty_sheet_is_a_no_op() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    let summary = run(
        &temp,
        &registry(),
        &single_file("Weapon"),
        false,
        vec![RawSheet::new("Weapons", vec![])],
    );

    assert_eq!(summary.sheets[0].status, SheetStatus::Empty);
    assert!(!summary.has_errors());
    assert!(!out_path(&temp, "Weapons").exists());
}

/// The sheet's embedded key name is used when the entry has none.
#[test]
fn test_sheet_key_name_is_the_fallback() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let mut entry = single_file("");
    entry.key.clear();

    run(
        &temp,
        &registry(),
        &entry,
        false,
        vec![
            RawSheet::new("Weapons", vec![row("sword", 12)])
                .with_class_name("Weapon")
                .with_key_name("damage"),
        ],
    );

    let container = load_container(&out_path(&temp, "Weapons"));
    assert_eq!(container.key_field(), Some("damage"));
    assert_eq!(container.get_by_int_key(12), Some(&weapon("sword", 12)));
}

/// An artifact of another type at the container path is replaced.
#[test]
fn test_foreign_artifact_is_replaced() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let store = FsStore::new();
    store
        .write(
            &out_path(&temp, "Weapons"),
            &Artifact::record("config.Setting", serde_json::json!({"name": "x"})),
        )
        .expect("Failed to write artifact");

    let summary = run(
        &temp,
        &registry(),
        &single_file("Weapon"),
        false,
        vec![RawSheet::new("Weapons", vec![row("sword", 12)])],
    );

    assert_eq!(summary.totals().updated, 1);
    assert_eq!(
        load_container(&out_path(&temp, "Weapons")).items(),
        &[weapon("sword", 12)]
    );
}

/// A run without a key field clears the key of the previous run.
#[test]
fn test_key_field_is_replaced_on_each_run() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let registry = registry();
    let sheet = || RawSheet::new("Weapons", vec![row("sword", 12)]);

    run(&temp, &registry, &single_file("Weapon"), false, vec![sheet()]);
    assert_eq!(
        load_container(&out_path(&temp, "Weapons")).key_field(),
        Some("id")
    );

    let mut keyless = single_file("Weapon");
    keyless.key.clear();
    run(&temp, &registry, &keyless, false, vec![sheet()]);

    let container = load_container(&out_path(&temp, "Weapons"));
    assert_eq!(container.key_field(), None);
    assert_eq!(container.items(), &[weapon("sword", 12)]);
}
