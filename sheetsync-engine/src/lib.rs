//! Conversion and reconciliation engine for sheetsync.
//!
//! This crate turns the raw sheets of a workbook dump into typed records and
//! keeps a directory of generated artifacts in sync with them.
//!
//! # Module Organization
//!
//! - [`registry`] - Schema registry and type-name resolution
//! - [`schema`] - Record schemas (Rust records and declared schemas)
//! - [`config`] - Per-sheet conversion settings
//! - [`coerce`] - Raw value to typed value conversion
//! - [`container`] - Typed record containers with key lookup
//! - [`generate`] - Single-file and multi-file generators
//! - [`pipeline`] - Two-phase plan/apply runs, outcomes and diagnostics
//! - [`source`] - Workbook dump reader

mod access;
pub mod coerce;
pub mod config;
pub mod container;
mod error;
pub mod generate;
mod keypath;
pub mod pipeline;
pub mod reconcile;
pub mod registry;
pub mod schema;
pub mod source;

pub use access::FieldAccess;
pub use coerce::{coerce, coerce_field, coerce_row};
pub use config::{ConversionConfig, GenerationMode};
pub use container::{LoadStats, TypedContainer};
pub use error::{ConvertError, ErrorClass, Result};
pub use keypath::KeyPath;
pub use pipeline::{Converter, Diagnostic, EntryPlan, EntrySummary, Severity, SheetOutcome};
pub use registry::SchemaRegistry;
pub use schema::{DeclaredSchema, FieldDescriptor, LineRecord, Record, Schema};
pub use source::Workbook;

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
