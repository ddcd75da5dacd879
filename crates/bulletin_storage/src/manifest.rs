//! Artifact manifest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Write state of one artifact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ArtifactState {
    /// Writing started but has not finished
    InProgress,
    /// File fully written
    Complete,
}

/// Manifest entry for one artifact file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Write state
    pub state: ArtifactState,
    /// SHA-256 of the file contents once complete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    /// Last state change
    pub updated_at: DateTime<Utc>,
}

/// Index of artifact file name to entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<String, ManifestEntry>,
}

impl Manifest {
    /// Entry for `file_name`.
    pub fn get(&self, file_name: &str) -> Option<&ManifestEntry> {
        self.entries.get(file_name)
    }

    /// Whether `file_name` finished writing.
    pub fn is_complete(&self, file_name: &str) -> bool {
        self.get(file_name)
            .is_some_and(|entry| entry.state == ArtifactState::Complete)
    }

    pub(crate) fn mark_in_progress(&mut self, file_name: String) {
        self.entries.insert(
            file_name,
            ManifestEntry {
                state: ArtifactState::InProgress,
                sha256: None,
                updated_at: Utc::now(),
            },
        );
    }

    pub(crate) fn mark_complete(&mut self, file_name: String, sha256: String) {
        self.entries.insert(
            file_name,
            ManifestEntry {
                state: ArtifactState::Complete,
                sha256: Some(sha256),
                updated_at: Utc::now(),
            },
        );
    }

    /// Iterates entries in file name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ManifestEntry)> {
        self.entries.iter()
    }
}
