//! Raw sheets.

use serde::{Deserialize, Serialize};

use crate::RawRow;

/// Field names of a sheet entry in the parser's output.
pub struct SheetKey;

impl SheetKey {
    /// Sheet name (required, must be a string).
    pub const SHEET_NAME: &'static str = "sheetName";
    /// Ordered row list.
    pub const DATA_LIST: &'static str = "dataList";
    /// Sheet-embedded key-field name.
    pub const KEY_NAME: &'static str = "keyName";
    /// Sheet-embedded target type name.
    pub const CLASS_NAME: &'static str = "className";
}

/// One named table of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSheet {
    /// Sheet name, also the single-file artifact name.
    #[serde(rename = "sheetName")]
    pub name: String,
    /// Rows in source order.
    #[serde(rename = "dataList", default)]
    pub rows: Vec<RawRow>,
    /// Key-field name embedded in the sheet, if any.
    #[serde(rename = "keyName", default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    /// Target type name embedded in the sheet, if any.
    #[serde(rename = "className", default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl RawSheet {
    /// Create a sheet from a name and its rows.
    pub fn new(name: impl Into<String>, rows: Vec<RawRow>) -> Self {
        Self {
            name: name.into(),
            rows,
            key_name: None,
            class_name: None,
        }
    }

    /// Set the embedded key-field name.
    pub fn with_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = Some(key_name.into());
        self
    }

    /// Set the embedded type name.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
