//! Report data structures for commands.
//!
//! This module provides data structures that separate data collection from rendering.
//! Commands build reports, then render them to an Output target.

mod check;
mod convert;
mod lookup;
mod output;
mod schemas;

pub use check::CheckReport;
pub use convert::{ConvertReport, EntryRun};
pub use lookup::LookupReport;
pub use output::{Report, TerminalOutput};
pub use schemas::{SchemaInfo, SchemasReport};
