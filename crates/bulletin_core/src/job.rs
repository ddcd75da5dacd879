//! Generation job records and service status.

use serde::{Deserialize, Serialize};

/// Durable local record of one external generation job.
///
/// Created when the job is submitted and updated only by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Job key: the take id
    pub clip: u32,
    /// Service that renders the clip
    pub processor: String,
    /// External job id
    pub video_id: String,
    /// Service reported the job completed
    pub done: bool,
    /// Failure message when the service reported the job failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    /// Input text
    pub text: String,
    /// Input image reference
    pub frame: String,
    /// Output URL, empty until completed
    #[serde(default)]
    pub url: String,
}

impl JobRecord {
    /// A freshly submitted record.
    pub fn submitted(
        clip: u32,
        processor: impl Into<String>,
        video_id: impl Into<String>,
        text: impl Into<String>,
        frame: impl Into<String>,
    ) -> Self {
        Self {
            clip,
            processor: processor.into(),
            video_id: video_id.into(),
            done: false,
            failure: None,
            text: text.into(),
            frame: frame.into(),
            url: String::new(),
        }
    }

    /// Whether the service reported the job as failed.
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// Job status values reported by the rendering service.
///
/// # Examples
///
/// ```
/// use bulletin_core::JobStatus;
/// use std::str::FromStr;
///
/// assert_eq!(JobStatus::from_str("completed").unwrap(), JobStatus::Completed);
/// assert!(JobStatus::Processing.is_pending());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Queued
    Pending,
    /// Rendering
    Processing,
    /// Waiting on a dependency
    Waiting,
    /// Finished; output available
    Completed,
    /// Finished without output
    Failed,
}

impl JobStatus {
    /// Whether the job may still change state.
    pub fn is_pending(&self) -> bool {
        !matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// One status query result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusReport {
    /// Current status
    pub status: JobStatus,
    /// Download URL once completed
    pub video_url: Option<String>,
    /// Failure message once failed
    pub error: Option<String>,
}

/// Remaining rendering quota.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quota {
    /// Remaining quota in seconds of rendered video
    pub remaining_quota: f64,
}

impl Quota {
    /// Remaining credits; one credit renders up to a minute.
    pub fn credits(&self) -> f64 {
        self.remaining_quota / 60.0
    }
}
