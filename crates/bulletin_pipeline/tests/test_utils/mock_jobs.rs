//! Generation job client with per-job scripted statuses.

use async_trait::async_trait;
use bulletin_core::{JobStatus, JobStatusReport, Quota};
use bulletin_error::{RenderError, RenderErrorKind};
use bulletin_interface::GenerationJobClient;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Calls {
    uploads: Vec<String>,
    submits: Vec<(String, String)>,
    deletes: Vec<String>,
    status_queries: Vec<String>,
    downloads: Vec<String>,
}

/// Job client whose status answers are scripted per job id.
///
/// Jobs are numbered `job-1`, `job-2`, ... in submission order. Each status
/// query pops the job's next scripted answer; the last answer repeats. A job
/// with no script reports an unparsable status.
pub struct MockJobClient {
    statuses: Mutex<HashMap<String, VecDeque<Result<JobStatusReport, RenderErrorKind>>>>,
    failing_uploads: HashSet<String>,
    failing_downloads: HashSet<String>,
    remaining_quota: f64,
    calls: Arc<Mutex<Calls>>,
}

impl Default for MockJobClient {
    fn default() -> Self {
        Self {
            statuses: Mutex::new(HashMap::new()),
            failing_uploads: HashSet::new(),
            failing_downloads: HashSet::new(),
            remaining_quota: 600.0,
            calls: Arc::new(Mutex::new(Calls::default())),
        }
    }
}

/// Still rendering.
pub fn processing() -> Result<JobStatusReport, RenderErrorKind> {
    Ok(JobStatusReport {
        status: JobStatus::Processing,
        video_url: None,
        error: None,
    })
}

/// Finished with a download URL.
pub fn completed(url: &str) -> Result<JobStatusReport, RenderErrorKind> {
    Ok(JobStatusReport {
        status: JobStatus::Completed,
        video_url: Some(url.to_string()),
        error: None,
    })
}

/// Finished without output.
pub fn failed(message: &str) -> Result<JobStatusReport, RenderErrorKind> {
    Ok(JobStatusReport {
        status: JobStatus::Failed,
        video_url: None,
        error: Some(message.to_string()),
    })
}

impl MockJobClient {
    /// Script the status answers for `job_id`.
    pub fn with_statuses(
        self,
        job_id: &str,
        answers: Vec<Result<JobStatusReport, RenderErrorKind>>,
    ) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .insert(job_id.to_string(), answers.into());
        self
    }

    /// Fail uploads of the frame at `path`.
    pub fn with_failing_upload(mut self, path: impl Into<String>) -> Self {
        self.failing_uploads.insert(path.into());
        self
    }

    /// Fail downloads from `url`.
    pub fn with_failing_download(mut self, url: impl Into<String>) -> Self {
        self.failing_downloads.insert(url.into());
        self
    }

    /// Set the remaining quota in seconds.
    pub fn with_quota(mut self, seconds: f64) -> Self {
        self.remaining_quota = seconds;
        self
    }

    /// Frames uploaded.
    pub fn uploads(&self) -> Vec<String> {
        self.calls.lock().unwrap().uploads.clone()
    }

    /// (title, text) of each submitted job.
    pub fn submits(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().submits.clone()
    }

    /// Assets deleted.
    pub fn deletes(&self) -> Vec<String> {
        self.calls.lock().unwrap().deletes.clone()
    }

    /// Job ids whose status was queried, in order.
    pub fn status_queries(&self) -> Vec<String> {
        self.calls.lock().unwrap().status_queries.clone()
    }

    /// URLs downloaded, including failed attempts.
    pub fn downloads(&self) -> Vec<String> {
        self.calls.lock().unwrap().downloads.clone()
    }
}

#[async_trait]
impl GenerationJobClient for MockJobClient {
    async fn check_quota(&self) -> Result<Quota, RenderError> {
        Ok(Quota {
            remaining_quota: self.remaining_quota,
        })
    }

    async fn upload_asset(&self, path: &Path) -> Result<String, RenderError> {
        let path = path.display().to_string();
        self.calls.lock().unwrap().uploads.push(path.clone());
        if self.failing_uploads.contains(&path) {
            return Err(RenderError::new(RenderErrorKind::Upload(path)));
        }
        Ok(format!("asset-{}", path))
    }

    async fn submit_job(
        &self,
        title: &str,
        text: &str,
        _asset_id: &str,
    ) -> Result<String, RenderError> {
        let mut calls = self.calls.lock().unwrap();
        calls.submits.push((title.to_string(), text.to_string()));
        Ok(format!("job-{}", calls.submits.len()))
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusReport, RenderError> {
        self.calls
            .lock()
            .unwrap()
            .status_queries
            .push(job_id.to_string());

        let mut statuses = self.statuses.lock().unwrap();
        let Some(queue) = statuses.get_mut(job_id) else {
            return Err(RenderError::new(RenderErrorKind::StatusUnparsable(
                "unknown job".to_string(),
            )));
        };
        let answer = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        match answer {
            Some(Ok(report)) => Ok(report),
            Some(Err(kind)) => Err(RenderError::new(kind)),
            None => Err(RenderError::new(RenderErrorKind::StatusUnparsable(
                "empty script".to_string(),
            ))),
        }
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<(), RenderError> {
        self.calls.lock().unwrap().downloads.push(url.to_string());
        if self.failing_downloads.contains(url) {
            return Err(RenderError::new(RenderErrorKind::Download(url.to_string())));
        }
        tokio::fs::write(dest, format!("mp4 from {}", url))
            .await
            .map_err(|e| RenderError::new(RenderErrorKind::Download(e.to_string())))
    }

    async fn delete_asset(&self, asset_id: &str) -> Result<(), RenderError> {
        self.calls.lock().unwrap().deletes.push(asset_id.to_string());
        Ok(())
    }

    fn processor_name(&self) -> &'static str {
        "Mock Avatar"
    }
}
