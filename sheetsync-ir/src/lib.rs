//! Raw data model for the sheetsync conversion engine.
//!
//! These types describe what the external spreadsheet parser hands over:
//! named sheets made of ordered rows, where every row maps a column name to
//! a scalar, a list or a nested row.
//!
//! # Architecture
//!
//! ```text
//! workbook dump (JSON) → sheetsync-ir (raw rows) → sheetsync-engine (typed records) → artifacts
//! ```
//!
//! The raw types are immutable once handed to the engine and carry no
//! knowledge of target schemas.

mod row;
mod sheet;
mod value;

pub use row::RawRow;
pub use sheet::{RawSheet, SheetKey};
pub use value::RawValue;
