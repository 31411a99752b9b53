//! Core utilities and types for sheetsync.
//!
//! This crate provides the fundamental types shared by the manifest parser,
//! the conversion engine and the CLI: artifact identities, field kinds and
//! the artifact storage abstraction.

mod artifact;
mod identity;
mod kind;
mod store;
mod utils;

// Artifacts
pub use artifact::{
    ARTIFACT_EXTENSION, Artifact, ArtifactKind, ArtifactMeta, SIDECAR_EXTENSION, artifact_path,
    sidecar_path,
};
pub use identity::ArtifactIdentity;
// Fundamental types
pub use kind::FieldKind;
// Storage
pub use store::{ArtifactStore, FsStore, StoreError, WriteResult};
// String utilities
pub use utils::simple_name;
