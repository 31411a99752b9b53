//! Core operations.
//!
//! This module contains the business logic for sheetsync commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod convert;
pub mod lookup;
pub mod schemas;

pub use check::check;
pub use convert::convert;
pub use lookup::lookup;
pub use schemas::schemas;
