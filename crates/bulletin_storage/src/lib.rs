//! Manifest-backed artifact store for Bulletin working directories.
//!
//! Each run writes its outputs into one working directory (by default
//! `gen/<date>/`). Every output has a fixed file name, and a `manifest.json`
//! records which outputs finished writing.
//!
//! # Features
//!
//! - **Atomic writes**: temp file + rename, then the manifest entry is marked complete
//! - **Completion checks**: an artifact counts as present only when its manifest
//!   entry is complete *and* its file exists, so interrupted writes are redone
//! - **Dated workspaces**: [`WorkspaceRoot`] finds recent working directories
//!
//! # Example
//!
//! ```rust
//! use bulletin_storage::{Artifact, ArtifactStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ArtifactStore::open("/tmp/gen/2026-10-16")?;
//! store.write_text(&Artifact::Post, "See you tomorrow!").await?;
//! assert!(store.is_complete(&Artifact::Post));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod artifact;
mod manifest;
mod store;
mod workspace;

pub use artifact::Artifact;
pub use bulletin_error::{StorageError, StorageErrorKind};
pub use manifest::{ArtifactState, Manifest, ManifestEntry};
pub use store::ArtifactStore;
pub use workspace::WorkspaceRoot;
