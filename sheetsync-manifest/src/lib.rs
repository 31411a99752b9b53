// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

//! Parsing and validation of `sheetsync.toml`.
//!
//! The manifest declares record schemas, run settings and the list of
//! workbook dumps to convert. Parse and validation errors carry source spans
//! and render through `miette`.

mod error;
mod manifest;

pub use error::{Error, Result, SourceContext};
pub use manifest::{
    ConvertEntry, DEFAULT_FILENAME, Manifest, ParseContext, SchemaDecl, Settings, SheetsyncToml,
};
