//! Typed record containers.

use std::{cell::RefCell, collections::HashMap, path::Path, slice};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sheetsync_core::{Artifact, ArtifactKind};
use sheetsync_ir::{RawRow, RawSheet};
use tracing::{error, info, warn};

use crate::{
    ConvertError, FieldAccess, Result,
    access::key_text,
    coerce::{coerce_row, to_json},
};

/// Lazily built map from key text to item position.
#[derive(Debug, Clone, Default)]
struct KeyIndex {
    built: bool,
    /// Item count the index was built from.
    built_from: usize,
    positions: HashMap<String, usize>,
}

/// An ordered collection of records with lookup by key.
///
/// This is the payload of a single-file artifact. The key index is derived
/// state: it is built on the first key lookup and rebuilt whenever the item
/// count differs from the one it was built from or the items are replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypedContainer<T> {
    #[serde(default)]
    key_field: Option<String>,
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(skip)]
    index: RefCell<KeyIndex>,
}

/// Counts reported by the container load operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub total: usize,
    pub loaded: usize,
    pub skipped: usize,
}

impl<T> Default for TypedContainer<T> {
    fn default() -> Self {
        Self {
            key_field: None,
            items: Vec::new(),
            index: RefCell::default(),
        }
    }
}

impl<T> TypedContainer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a container from a key field and items.
    pub fn from_parts(key_field: Option<String>, items: Vec<T>) -> Self {
        Self {
            key_field,
            items,
            index: RefCell::default(),
        }
    }

    pub fn key_field(&self) -> Option<&str> {
        self.key_field.as_deref()
    }

    /// Set the key field. Empty names unset it.
    pub fn set_key_field(&mut self, key_field: Option<String>) {
        self.key_field = key_field.filter(|k| !k.trim().is_empty());
        self.invalidate();
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Replace every item. The key index is rebuilt on the next lookup.
    pub fn replace_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.invalidate();
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an item by position, `None` when out of range.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    fn invalidate(&mut self) {
        *self.index.get_mut() = KeyIndex::default();
    }
}

impl<T: FieldAccess> TypedContainer<T> {
    /// Get an item by its key text.
    ///
    /// Without a key field this logs an error and finds nothing.
    pub fn get_by_key(&self, key: &str) -> Option<&T> {
        let Some(key_field) = self.key_field.as_deref() else {
            error!("{}, set a key field to look records up by key", ConvertError::NoKeyField);
            return None;
        };

        self.ensure_index(key_field);
        let position = self.index.borrow().positions.get(key).copied();
        position.and_then(|i| self.items.get(i))
    }

    /// Get an item by an integer key.
    pub fn get_by_int_key(&self, key: i64) -> Option<&T> {
        self.get_by_key(&key.to_string())
    }

    fn ensure_index(&self, key_field: &str) {
        let mut index = self.index.borrow_mut();
        if index.built && index.built_from == self.items.len() {
            return;
        }

        let mut positions = HashMap::with_capacity(self.items.len());
        let mut duplicates = 0;
        let mut missing = 0;

        for (i, item) in self.items.iter().enumerate() {
            let Some(key) = item.field(key_field).as_ref().and_then(key_text) else {
                missing += 1;
                continue;
            };
            if positions.contains_key(&key) {
                duplicates += 1;
                warn!("duplicate key '{}' at item {}, keeping the first", key, i);
                continue;
            }
            positions.insert(key, i);
        }

        if duplicates > 0 {
            warn!("key index built with {} duplicate key(s)", duplicates);
        }
        if missing == self.items.len() && !self.items.is_empty() {
            warn!("no item has a value for key field '{}'", key_field);
        }

        *index = KeyIndex {
            built: true,
            built_from: self.items.len(),
            positions,
        };
    }
}

impl<T> TypedContainer<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Take the key field from a sheet's embedded `keyName`.
    pub fn load_key_field(&mut self, sheet: &RawSheet) {
        self.set_key_field(sheet.key_name.clone());
    }

    /// Replace the items with records converted from `rows`, in order.
    ///
    /// Rows that fail to convert are logged and left out.
    pub fn load_rows(&mut self, rows: &[RawRow]) -> LoadStats {
        let mut items = Vec::with_capacity(rows.len());
        let mut stats = LoadStats {
            total: rows.len(),
            ..Default::default()
        };

        for (i, row) in rows.iter().enumerate() {
            match coerce_row::<T>(row) {
                Ok(item) => {
                    items.push(item);
                    stats.loaded += 1;
                }
                Err(e) => {
                    error!("row {}: {}", i, e);
                    stats.skipped += 1;
                }
            }
        }

        info!("loaded {}/{} records", stats.loaded, stats.total);
        self.replace_items(items);
        stats
    }

    /// Replace the items with records from a JSON array of rows.
    ///
    /// `null` entries are skipped. When the text is not an array of rows the
    /// container is emptied and the error returned.
    pub fn load_json(&mut self, json: &str) -> Result<LoadStats> {
        if json.trim().is_empty() {
            warn!("empty JSON, clearing records");
            self.replace_items(Vec::new());
            return Ok(LoadStats::default());
        }

        let rows: Vec<Option<RawRow>> = match serde_json::from_str(json) {
            Ok(rows) => rows,
            Err(e) => {
                self.replace_items(Vec::new());
                return Err(ConvertError::coerce("row list", "text", e));
            }
        };

        let total = rows.len();
        let rows: Vec<RawRow> = rows.into_iter().flatten().collect();
        if rows.len() < total {
            warn!("skipped {} empty row(s)", total - rows.len());
        }

        let mut stats = self.load_rows(&rows);
        stats.skipped += total - rows.len();
        stats.total = total;
        Ok(stats)
    }

    /// Open a container artifact.
    pub fn from_artifact(artifact: &Artifact, path: &Path) -> Result<Self> {
        if artifact.kind != ArtifactKind::Container {
            return Err(ConvertError::ArtifactKind {
                path: path.to_path_buf(),
                found: artifact.kind.as_str(),
                expected: ArtifactKind::Container.as_str(),
            });
        }
        serde_json::from_value(artifact.data.clone())
            .map_err(|e| ConvertError::coerce(&artifact.type_path, "artifact", e))
    }

    /// Wrap the container in an artifact envelope.
    pub fn to_artifact(&self, type_path: &str) -> Result<Artifact> {
        Ok(Artifact::container(type_path, to_json(self, type_path)?))
    }
}

impl<'a, T> IntoIterator for &'a TypedContainer<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::field_access;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: String,
        level: i64,
    }
    field_access!(Item { id, level });

    fn item(id: &str, level: i64) -> Item {
        Item {
            id: id.into(),
            level,
        }
    }

    #[test]
    fn test_get_by_index_is_bounds_checked() {
        let container = TypedContainer::from_parts(None, vec![item("a", 1)]);
        assert_eq!(container.get(0), Some(&item("a", 1)));
        assert_eq!(container.get(1), None);
        assert_eq!(container.count(), 1);
    }

    #[test]
    fn test_get_by_key() {
        let container =
            TypedContainer::from_parts(Some("id".into()), vec![item("a", 1), item("b", 2)]);

        assert_eq!(container.get_by_key("b"), Some(&item("b", 2)));
        assert_eq!(container.get_by_key("c"), None);
    }

    #[test]
    fn test_get_by_int_key() {
        let container =
            TypedContainer::from_parts(Some("level".into()), vec![item("a", 1), item("b", 2)]);
        assert_eq!(container.get_by_int_key(2), Some(&item("b", 2)));
    }

    #[test]
    fn test_duplicate_key_keeps_first() {
        let container = TypedContainer::from_parts(
            Some("id".into()),
            vec![item("K1", 1), item("K1", 2), item("K2", 3)],
        );

        assert_eq!(container.get_by_key("K1"), Some(&item("K1", 1)));
        assert_eq!(container.get_by_key("K1"), Some(&item("K1", 1)));
        assert_eq!(container.len(), 3);
    }

    #[test]
    fn test_no_key_field_finds_nothing() {
        let container = TypedContainer::from_parts(None, vec![item("a", 1)]);
        assert_eq!(container.get_by_key("a"), None);
    }

    #[test]
    fn test_replace_rebuilds_index() {
        let mut container = TypedContainer::from_parts(Some("id".into()), vec![item("a", 1)]);
        assert!(container.get_by_key("a").is_some());

        container.replace_items(vec![item("b", 2)]);

        assert_eq!(container.get_by_key("a"), None);
        assert_eq!(container.get_by_key("b"), Some(&item("b", 2)));
    }

    #[test]
    fn test_value_items() {
        let container = TypedContainer::from_parts(
            Some("id".into()),
            vec![json!({"id": 7, "name": "seven"})],
        );
        assert_eq!(
            container.get_by_int_key(7).map(|v| &v["name"]),
            Some(&Value::from("seven"))
        );
    }

    #[test]
    fn test_load_key_field() {
        let mut container = TypedContainer::<Item>::new();

        container.load_key_field(&RawSheet::new("Items", vec![]).with_key_name("id"));
        assert_eq!(container.key_field(), Some("id"));

        container.load_key_field(&RawSheet::new("Items", vec![]).with_key_name(""));
        assert_eq!(container.key_field(), None);
    }

    #[test]
    fn test_load_rows_replaces_items() {
        let mut container = TypedContainer::from_parts(None, vec![item("old", 0)]);
        let rows = vec![
            RawRow::new().with("id", "a").with("level", 1),
            RawRow::new().with("id", "b").with("level", "high"),
            RawRow::new().with("id", "c"),
        ];

        let stats = container.load_rows(&rows);

        assert_eq!(
            stats,
            LoadStats {
                total: 3,
                loaded: 2,
                skipped: 1
            }
        );
        assert_eq!(container.items(), &[item("a", 1), item("c", 0)]);
    }

    #[test]
    fn test_load_json() {
        let mut container = TypedContainer::<Item>::new();
        let stats = container
            .load_json(r#"[{"id": "a", "level": 1}, null, {"id": "b"}]"#)
            .unwrap();

        assert_eq!(stats.loaded, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.total, 3);
        assert_eq!(container.items(), &[item("a", 1), item("b", 0)]);
    }

    #[test]
    fn test_load_json_invalid_clears() {
        let mut container = TypedContainer::from_parts(None, vec![item("old", 0)]);
        assert!(container.load_json(r#"{"id": "a"}"#).is_err());
        assert!(container.is_empty());
    }

    #[test]
    fn test_artifact_roundtrip() {
        let container = TypedContainer::from_parts(Some("id".into()), vec![item("a", 1)]);
        let artifact = container.to_artifact("game.Item").unwrap();

        assert_eq!(
            artifact.data,
            json!({"key_field": "id", "items": [{"id": "a", "level": 1}]})
        );

        let loaded = TypedContainer::<Item>::from_artifact(&artifact, Path::new("Items.json")).unwrap();
        assert_eq!(loaded.get_by_key("a"), Some(&item("a", 1)));
    }

    #[test]
    fn test_from_record_artifact_fails() {
        let artifact = Artifact::record("game.Item", json!({"id": "a"}));
        let err = TypedContainer::<Item>::from_artifact(&artifact, Path::new("a.json")).unwrap_err();
        assert!(matches!(err, ConvertError::ArtifactKind { .. }));
    }
}
