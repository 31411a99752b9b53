//! Artifact generators.
//!
//! Each generator works in two steps. Planning is pure: it converts every row
//! of a sheet into the records to write. Applying takes a plan to an
//! [`ArtifactStore`](sheetsync_core::ArtifactStore) and is the only step that
//! touches artifacts.

pub mod multi;
pub mod single;

pub use multi::{MultiPlan, RowPlan};
pub use single::SinglePlan;
