//! Filesystem artifact store.

use crate::artifact::{JOB_RECORD_PREFIX, JSON_SUFFIX, TARGET_EVENTS_PREFIX};
use crate::{Artifact, Manifest};
use bulletin_core::JobRecord;
use bulletin_error::{BulletinResult, StorageError, StorageErrorKind};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const MANIFEST_FILE: &str = "manifest.json";

/// Artifact store rooted at one working directory.
///
/// # Layout
///
/// ```text
/// gen/2026-10-16/
/// ├── manifest.json
/// ├── events_<target>.json
/// ├── events.json
/// ├── research_tokens.json
/// ├── script.json
/// ├── storyboard.json
/// ├── generated_frame_<i>.jpg
/// ├── clip_<take>.json
/// ├── clip_<take>.mp4
/// ├── video.mp4
/// └── post.txt
/// ```
pub struct ArtifactStore {
    dir: PathBuf,
    manifest_lock: Mutex<()>,
}

fn compute_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

fn write_error(path: &Path, e: impl std::fmt::Display) -> StorageError {
    StorageError::new(StorageErrorKind::FileWrite(format!("{}: {}", path.display(), e)))
}

fn read_error(path: &Path, e: std::io::Error) -> StorageError {
    if e.kind() == std::io::ErrorKind::NotFound {
        StorageError::new(StorageErrorKind::NotFound(path.display().to_string()))
    } else {
        StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", path.display(), e)))
    }
}

impl ArtifactStore {
    /// Open the store, creating the working directory if needed.
    #[tracing::instrument(skip(dir))]
    pub fn open(dir: impl Into<PathBuf>) -> BulletinResult<Self> {
        let dir = dir.into();

        std::fs::create_dir_all(&dir).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        })?;

        tracing::debug!(path = %dir.display(), "Opened artifact store");
        Ok(Self {
            dir,
            manifest_lock: Mutex::new(()),
        })
    }

    /// Working directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Final path of `artifact`.
    pub fn path(&self, artifact: &Artifact) -> PathBuf {
        self.dir.join(artifact.file_name())
    }

    /// Scratch path external writers fill before [`commit_staged`](Self::commit_staged).
    pub fn staging_path(&self, artifact: &Artifact) -> PathBuf {
        self.dir.join(format!("{}.part", artifact.file_name()))
    }

    /// Whether the artifact's file exists, regardless of manifest state.
    pub fn exists(&self, artifact: &Artifact) -> bool {
        self.path(artifact).is_file()
    }

    /// Whether the artifact finished writing and its file is still present.
    ///
    /// Synchronous and side-effect free. An unreadable manifest counts as empty.
    pub fn is_complete(&self, artifact: &Artifact) -> bool {
        let manifest = self.manifest().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Unreadable manifest, treating as empty");
            Manifest::default()
        });
        manifest.is_complete(&artifact.file_name()) && self.exists(artifact)
    }

    /// Current manifest. A missing manifest is empty.
    pub fn manifest(&self) -> BulletinResult<Manifest> {
        let path = self.dir.join(MANIFEST_FILE);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)
                .map_err(|e| StorageError::new(StorageErrorKind::Manifest(e.to_string())))?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Manifest::default()),
            Err(e) => Err(read_error(&path, e).into()),
        }
    }

    async fn update_manifest(&self, update: impl FnOnce(&mut Manifest)) -> BulletinResult<()> {
        let _lock = self.manifest_lock.lock().await;
        let mut manifest = self.manifest()?;
        update(&mut manifest);

        let path = self.dir.join(MANIFEST_FILE);
        let bytes = serde_json::to_vec_pretty(&manifest)
            .map_err(|e| StorageError::new(StorageErrorKind::Manifest(e.to_string())))?;
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, bytes)
            .await
            .map_err(|e| write_error(&temp_path, e))?;
        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| write_error(&path, e))?;
        Ok(())
    }

    /// Mark `artifact` as being written.
    pub async fn begin(&self, artifact: &Artifact) -> BulletinResult<()> {
        self.update_manifest(|m| m.mark_in_progress(artifact.file_name()))
            .await
    }

    /// Hash the artifact's file and mark it complete.
    #[tracing::instrument(skip(self), fields(artifact = %artifact))]
    pub async fn commit(&self, artifact: &Artifact) -> BulletinResult<()> {
        let path = self.path(artifact);
        let data = tokio::fs::read(&path)
            .await
            .map_err(|e| read_error(&path, e))?;
        let hash = compute_hash(&data);
        self.update_manifest(|m| m.mark_complete(artifact.file_name(), hash))
            .await?;
        tracing::debug!(path = %path.display(), size = data.len(), "Committed artifact");
        Ok(())
    }

    /// Move the staged file into place and mark it complete.
    pub async fn commit_staged(&self, artifact: &Artifact) -> BulletinResult<()> {
        let staged = self.staging_path(artifact);
        let path = self.path(artifact);
        tokio::fs::rename(&staged, &path).await.map_err(|e| {
            write_error(&path, format!("rename from {}: {}", staged.display(), e))
        })?;
        self.commit(artifact).await
    }

    /// Atomically write `data` as `artifact` and mark it complete.
    #[tracing::instrument(skip(self, data), fields(artifact = %artifact, size = data.len()))]
    pub async fn write_bytes(&self, artifact: &Artifact, data: &[u8]) -> BulletinResult<()> {
        self.begin(artifact).await?;

        let path = self.path(artifact);
        let temp_path = self.staging_path(artifact);
        tokio::fs::write(&temp_path, data)
            .await
            .map_err(|e| write_error(&temp_path, e))?;
        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| write_error(&path, e))?;

        let hash = compute_hash(data);
        self.update_manifest(|m| m.mark_complete(artifact.file_name(), hash))
            .await?;

        tracing::info!(path = %path.display(), size = data.len(), "Wrote artifact");
        Ok(())
    }

    /// Write `text` as `artifact`.
    pub async fn write_text(&self, artifact: &Artifact, text: &str) -> BulletinResult<()> {
        self.write_bytes(artifact, text.as_bytes()).await
    }

    /// Write `value` as pretty-printed JSON.
    pub async fn write_json<T: Serialize + ?Sized>(
        &self,
        artifact: &Artifact,
        value: &T,
    ) -> BulletinResult<()> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!("{}: {}", artifact, e)))
        })?;
        self.write_bytes(artifact, &bytes).await
    }

    /// Read the raw bytes of `artifact`.
    pub async fn read_bytes(&self, artifact: &Artifact) -> BulletinResult<Vec<u8>> {
        let path = self.path(artifact);
        Ok(tokio::fs::read(&path)
            .await
            .map_err(|e| read_error(&path, e))?)
    }

    /// Read `artifact` as UTF-8 text.
    pub async fn read_text(&self, artifact: &Artifact) -> BulletinResult<String> {
        let path = self.path(artifact);
        Ok(tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| read_error(&path, e))?)
    }

    /// Read and decode a JSON artifact.
    pub async fn read_json<T: DeserializeOwned>(&self, artifact: &Artifact) -> BulletinResult<T> {
        let bytes = self.read_bytes(artifact).await?;
        Ok(decode(&artifact.file_name(), &bytes)?)
    }

    /// Read and decode a JSON artifact synchronously.
    pub fn read_json_sync<T: DeserializeOwned>(&self, artifact: &Artifact) -> BulletinResult<T> {
        let path = self.path(artifact);
        let bytes = std::fs::read(&path).map_err(|e| read_error(&path, e))?;
        Ok(decode(&artifact.file_name(), &bytes)?)
    }

    async fn list_names(&self) -> BulletinResult<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| read_error(&self.dir, e))?;
        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| read_error(&self.dir, e))?
        {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Names of the targets with a per-target dataset on disk, sorted.
    pub async fn target_datasets(&self) -> BulletinResult<Vec<String>> {
        Ok(self
            .list_names()
            .await?
            .into_iter()
            .filter_map(|name| {
                name.strip_prefix(TARGET_EVENTS_PREFIX)?
                    .strip_suffix(JSON_SUFFIX)
                    .map(str::to_string)
            })
            .collect())
    }

    /// Every job record on disk, ordered by take id.
    pub async fn job_records(&self) -> BulletinResult<Vec<JobRecord>> {
        let mut takes: Vec<u32> = self
            .list_names()
            .await?
            .into_iter()
            .filter_map(|name| {
                name.strip_prefix(JOB_RECORD_PREFIX)?
                    .strip_suffix(JSON_SUFFIX)?
                    .parse()
                    .ok()
            })
            .collect();
        takes.sort_unstable();

        let mut records = Vec::with_capacity(takes.len());
        for take in takes {
            records.push(self.read_json(&Artifact::JobRecord(take)).await?);
        }
        Ok(records)
    }
}

fn decode<T: DeserializeOwned>(name: &str, bytes: &[u8]) -> Result<T, StorageError> {
    serde_json::from_slice(bytes).map_err(|e| {
        StorageError::new(StorageErrorKind::Corrupt {
            name: name.to_string(),
            message: e.to_string(),
        })
    })
}
