//! Workbook dumps.
//!
//! A workbook dump is the external parser's output: a JSON array of sheet
//! entries, each with a `sheetName`, a `dataList` of rows and optionally a
//! `keyName` and a `className`. Reading is lenient: problems with one entry
//! or one row never prevent the rest of the workbook from being read.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use sheetsync_ir::{RawRow, RawSheet, SheetKey};
use tracing::{debug, warn};

use crate::{ConvertError, Result};

/// A parsed workbook dump.
#[derive(Debug)]
pub struct Workbook {
    pub path: PathBuf,
    /// Sheets in source order.
    pub sheets: Vec<SheetEntry>,
    /// Entries that were not sheets at all.
    pub skipped_entries: usize,
}

/// One sheet entry of a workbook.
#[derive(Debug)]
pub enum SheetEntry {
    Read(SourceSheet),
    /// A named entry whose row list could not be read.
    Malformed { name: String, error: ConvertError },
}

impl SheetEntry {
    pub fn name(&self) -> &str {
        match self {
            SheetEntry::Read(source) => &source.sheet.name,
            SheetEntry::Malformed { name, .. } => name,
        }
    }
}

/// A sheet and the rows that were left out while reading it.
#[derive(Debug)]
pub struct SourceSheet {
    pub sheet: RawSheet,
    /// Rows that are not row mappings.
    pub rejected: Vec<ConvertError>,
    /// `null` entries in the row list.
    pub empty_rows: usize,
}

impl SourceSheet {
    pub fn new(sheet: RawSheet) -> Self {
        Self {
            sheet,
            rejected: Vec::new(),
            empty_rows: 0,
        }
    }

    /// Length of the row list as written in the source.
    pub fn total_rows(&self) -> usize {
        self.sheet.rows.len() + self.rejected.len() + self.empty_rows
    }
}

impl Workbook {
    /// Read a workbook dump from disk.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConvertError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    /// Parse workbook dump text. `path` is only used in messages.
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let malformed = |message: String| ConvertError::MalformedWorkbook {
            path: path.to_path_buf(),
            message,
        };

        let value: Value = serde_json::from_str(text).map_err(|e| malformed(e.to_string()))?;
        let Value::Array(entries) = value else {
            return Err(malformed(format!("found {}", json_kind(&value))));
        };

        let mut workbook = Workbook {
            path: path.to_path_buf(),
            sheets: Vec::with_capacity(entries.len()),
            skipped_entries: 0,
        };

        for (index, entry) in entries.into_iter().enumerate() {
            match read_entry(index, entry) {
                Some(sheet) => workbook.sheets.push(sheet),
                None => workbook.skipped_entries += 1,
            }
        }

        debug!(
            "read {} sheet(s) from {}",
            workbook.sheets.len(),
            path.display()
        );
        Ok(workbook)
    }

    /// Workbook made of already parsed sheets.
    pub fn from_sheets(path: impl Into<PathBuf>, sheets: Vec<RawSheet>) -> Self {
        Self {
            path: path.into(),
            sheets: sheets
                .into_iter()
                .map(|sheet| SheetEntry::Read(SourceSheet::new(sheet)))
                .collect(),
            skipped_entries: 0,
        }
    }
}

fn read_entry(index: usize, entry: Value) -> Option<SheetEntry> {
    let Value::Object(mut fields) = entry else {
        warn!("entry {} is a {}, not a sheet, skipping", index, json_kind(&entry));
        return None;
    };

    let name = match fields.remove(SheetKey::SHEET_NAME) {
        Some(Value::String(name)) if !name.trim().is_empty() => name,
        Some(other) => {
            warn!(
                "entry {} has a {} {}, skipping",
                index,
                json_kind(&other),
                SheetKey::SHEET_NAME
            );
            return None;
        }
        None => {
            warn!("entry {} has no {}, skipping", index, SheetKey::SHEET_NAME);
            return None;
        }
    };

    let key_name = sentinel(&mut fields, SheetKey::KEY_NAME, &name);
    let class_name = sentinel(&mut fields, SheetKey::CLASS_NAME, &name);

    let rows = match fields.remove(SheetKey::DATA_LIST) {
        Some(Value::Array(rows)) => rows,
        None | Some(Value::Null) => Vec::new(),
        Some(other) => {
            let error = ConvertError::MalformedSheet {
                sheet: name.clone(),
                message: format!("{} is a {}, not a list", SheetKey::DATA_LIST, json_kind(&other)),
            };
            return Some(SheetEntry::Malformed { name, error });
        }
    };

    let mut source = SourceSheet::new(RawSheet::new(name, Vec::with_capacity(rows.len())));
    source.sheet.key_name = key_name;
    source.sheet.class_name = class_name;

    for (index, row) in rows.into_iter().enumerate() {
        match row {
            Value::Null => {
                warn!("sheet '{}': row {} is empty, skipping", source.sheet.name, index);
                source.empty_rows += 1;
            }
            Value::Object(_) => match serde_json::from_value::<RawRow>(row) {
                Ok(row) => source.sheet.rows.push(row),
                Err(e) => source.rejected.push(ConvertError::MalformedSheet {
                    sheet: source.sheet.name.clone(),
                    message: format!("row {}: {}", index, e),
                }),
            },
            other => source.rejected.push(ConvertError::MalformedRow {
                sheet: source.sheet.name.clone(),
                index,
                found: json_kind(&other),
            }),
        }
    }

    Some(SheetEntry::Read(source))
}

fn sentinel(fields: &mut Map<String, Value>, key: &str, sheet: &str) -> Option<String> {
    match fields.remove(key) {
        Some(Value::String(value)) => Some(value),
        None | Some(Value::Null) => None,
        Some(other) => {
            warn!(
                "sheet '{}': ignoring {} {}",
                sheet,
                json_kind(&other),
                key
            );
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
