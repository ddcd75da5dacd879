//! Submits rendering jobs and polls them to completion.
//!
//! Every job has a durable [`JobRecord`] in the working directory. Records are
//! written before polling starts and after every state change, so a restarted
//! run picks up where the last one stopped: existing records are never
//! resubmitted, and a completed job whose clip is missing is downloaded again
//! from the URL the service currently reports for it.

use bulletin_core::{JobRecord, JobStatus, JobStatusReport, Take};
use bulletin_error::{BulletinResult, PipelineError, PipelineErrorKind};
use bulletin_interface::GenerationJobClient;
use bulletin_storage::{Artifact, ArtifactStore};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Counts from one reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    /// Polling rounds run
    pub rounds: usize,
    /// Sleeps between rounds
    pub sleeps: usize,
    /// Jobs submitted
    pub submitted: usize,
    /// Takes skipped because a live record already existed
    pub skipped: usize,
    /// Clips downloaded
    pub downloaded: usize,
    /// Downloads that failed
    pub download_failures: usize,
    /// Jobs the service reported as failed
    pub failed: usize,
}

/// Drives generation jobs for one working directory.
pub struct JobReconciler<'a> {
    client: &'a dyn GenerationJobClient,
    store: &'a ArtifactStore,
    poll_interval: Duration,
    max_rounds: usize,
}

impl<'a> JobReconciler<'a> {
    /// Creates a reconciler polling every `poll_interval`, at most `max_rounds` times.
    pub fn new(
        client: &'a dyn GenerationJobClient,
        store: &'a ArtifactStore,
        poll_interval: Duration,
        max_rounds: usize,
    ) -> Self {
        Self {
            client,
            store,
            poll_interval,
            max_rounds: max_rounds.max(1),
        }
    }

    /// Submits `takes` and polls every job in the directory until all settle.
    ///
    /// `title` names the job for each take id.
    pub async fn reconcile(
        &self,
        takes: &[Take],
        title: impl Fn(u32) -> String,
    ) -> BulletinResult<ReconcileReport> {
        let mut report = ReconcileReport::default();
        self.log_quota().await;
        self.submit_all(takes, &title, &mut report).await?;
        self.poll(&mut report).await?;
        info!(
            rounds = report.rounds,
            submitted = report.submitted,
            skipped = report.skipped,
            downloaded = report.downloaded,
            download_failures = report.download_failures,
            failed = report.failed,
            "Reconciled jobs"
        );
        Ok(report)
    }

    async fn log_quota(&self) {
        match self.client.check_quota().await {
            Ok(quota) => info!(
                remaining_seconds = quota.remaining_quota,
                credits = quota.credits(),
                "Checked render quota"
            ),
            Err(e) => warn!(error = %e, "Render quota check failed"),
        }
    }

    /// Submits every take without a live record.
    #[instrument(skip_all, fields(takes = takes.len()))]
    pub async fn submit_all(
        &self,
        takes: &[Take],
        title: &impl Fn(u32) -> String,
        report: &mut ReconcileReport,
    ) -> BulletinResult<()> {
        for take in takes {
            let artifact = Artifact::JobRecord(take.id);
            if self.store.exists(&artifact) {
                let existing: JobRecord = self.store.read_json(&artifact).await?;
                if !existing.is_failed() {
                    debug!(take = take.id, video_id = %existing.video_id, "Job already submitted");
                    report.skipped += 1;
                    continue;
                }
                info!(take = take.id, "Resubmitting failed job");
            }

            match self.submit(take, &title(take.id)).await {
                Some(video_id) => {
                    let record = JobRecord::submitted(
                        take.id,
                        self.client.processor_name(),
                        video_id,
                        take.text.clone(),
                        take.frame.clone(),
                    );
                    self.store.write_json(&artifact, &record).await?;
                    info!(take = take.id, video_id = %record.video_id, "Started clip job");
                    report.submitted += 1;
                }
                None => continue,
            }
        }
        Ok(())
    }

    /// Uploads the frame, submits the job and removes the asset.
    ///
    /// Failures are logged and yield `None` so the other takes continue.
    async fn submit(&self, take: &Take, title: &str) -> Option<String> {
        let asset_id = match self.client.upload_asset(Path::new(&take.frame)).await {
            Ok(id) => id,
            Err(e) => {
                warn!(take = take.id, frame = %take.frame, error = %e, "Asset upload failed, skipping take");
                return None;
            }
        };

        let submitted = self.client.submit_job(title, &take.text, &asset_id).await;

        if let Err(e) = self.client.delete_asset(&asset_id).await {
            warn!(take = take.id, asset_id = %asset_id, error = %e, "Asset delete failed");
        }

        match submitted {
            Ok(video_id) => Some(video_id),
            Err(e) => {
                warn!(take = take.id, error = %e, "Job submission failed, skipping take");
                None
            }
        }
    }

    /// Polls until no job is pending.
    ///
    /// # Errors
    ///
    /// `PollLimitExceeded` when the round cap is reached with jobs pending.
    #[instrument(skip_all)]
    pub async fn poll(&self, report: &mut ReconcileReport) -> BulletinResult<()> {
        let mut attempted_downloads: HashSet<u32> = HashSet::new();

        loop {
            report.rounds += 1;
            let mut pending = 0usize;

            for mut record in self.store.job_records().await? {
                if record.is_failed() || attempted_downloads.contains(&record.clip) {
                    continue;
                }

                if record.done {
                    if !self.store.is_complete(&Artifact::Clip(record.clip)) {
                        attempted_downloads.insert(record.clip);
                        self.refresh_url(&mut record).await?;
                        self.download(&record, report).await?;
                    }
                    continue;
                }

                let status = match self.client.job_status(&record.video_id).await {
                    Ok(status) => status,
                    Err(e) => {
                        debug!(take = record.clip, error = %e, "Status unavailable, still pending");
                        pending += 1;
                        continue;
                    }
                };
                info!(take = record.clip, status = %status.status, "Clip status");

                match status.status {
                    JobStatus::Completed => match status.video_url {
                        Some(url) => {
                            record.done = true;
                            record.url = url;
                            self.store
                                .write_json(&Artifact::JobRecord(record.clip), &record)
                                .await?;
                            attempted_downloads.insert(record.clip);
                            self.download(&record, report).await?;
                        }
                        None => {
                            warn!(take = record.clip, "Completed without a video URL, still pending");
                            pending += 1;
                        }
                    },
                    JobStatus::Failed => {
                        let message = status.error.unwrap_or_else(|| "no reason given".to_string());
                        warn!(take = record.clip, error = %message, "Clip job failed");
                        record.failure = Some(message);
                        self.store
                            .write_json(&Artifact::JobRecord(record.clip), &record)
                            .await?;
                        report.failed += 1;
                    }
                    _ => pending += 1,
                }
            }

            if pending == 0 {
                return Ok(());
            }

            if report.rounds >= self.max_rounds {
                return Err(PipelineError::new(PipelineErrorKind::PollLimitExceeded {
                    rounds: report.rounds,
                    pending,
                })
                .into());
            }

            debug!(pending, interval = ?self.poll_interval, "Waiting for jobs");
            tokio::time::sleep(self.poll_interval).await;
            report.sleeps += 1;
        }
    }

    /// Replaces the recorded URL of a finished job with the one the service
    /// reports now. The recorded URL stays when the service gives none.
    async fn refresh_url(&self, record: &mut JobRecord) -> BulletinResult<()> {
        match self.client.job_status(&record.video_id).await {
            Ok(JobStatusReport {
                status: JobStatus::Completed,
                video_url: Some(url),
                ..
            }) => {
                if url != record.url {
                    debug!(take = record.clip, "Download URL refreshed");
                    record.url = url;
                    self.store
                        .write_json(&Artifact::JobRecord(record.clip), record)
                        .await?;
                }
            }
            Ok(status) => {
                debug!(take = record.clip, status = %status.status, "No fresh URL, using recorded one");
            }
            Err(e) => {
                debug!(take = record.clip, error = %e, "Status unavailable, using recorded URL");
            }
        }
        Ok(())
    }

    async fn download(&self, record: &JobRecord, report: &mut ReconcileReport) -> BulletinResult<()> {
        let clip = Artifact::Clip(record.clip);
        let staging = self.store.staging_path(&clip);

        match self.client.download(&record.url, &staging).await {
            Ok(()) => {
                self.store.commit_staged(&clip).await?;
                info!(take = record.clip, "Downloaded clip");
                report.downloaded += 1;
            }
            Err(e) => {
                warn!(take = record.clip, url = %record.url, error = %e, "Clip download failed");
                report.download_failures += 1;
            }
        }
        Ok(())
    }
}
