//! Job submission and polling under a paused clock.

mod test_utils;

use bulletin_core::{JobRecord, Take};
use bulletin_error::{BulletinErrorKind, PipelineErrorKind, RenderErrorKind};
use bulletin_pipeline::JobReconciler;
use bulletin_storage::{Artifact, ArtifactStore};
use test_utils::{MockJobClient, POLL_INTERVAL, completed, failed, processing};
use tokio::time::Instant;

fn takes(ids: &[u32]) -> Vec<Take> {
    ids.iter()
        .map(|id| Take::plain(*id, format!("text {}", id), format!("frame_{}.jpg", id)))
        .collect()
}

fn title(id: u32) -> String {
    format!("Around Town, 2026-10-16, Take {}", id)
}

#[tokio::test(start_paused = true)]
async fn test_three_jobs_complete_over_two_rounds() {
    let temp = tempfile::TempDir::new().unwrap();
    let store = ArtifactStore::open(temp.path()).unwrap();
    let client = MockJobClient::default()
        .with_statuses("job-1", vec![processing(), completed("https://cdn/1.mp4")])
        .with_statuses("job-2", vec![completed("https://cdn/2.mp4")])
        .with_statuses("job-3", vec![processing(), completed("https://cdn/3.mp4")]);
    let reconciler = JobReconciler::new(&client, &store, POLL_INTERVAL, 720);
    let start = Instant::now();

    let report = reconciler.reconcile(&takes(&[1, 2, 3]), title).await.unwrap();

    assert_eq!(report.submitted, 3);
    assert_eq!(report.downloaded, 3);
    assert_eq!(report.rounds, 2);
    assert_eq!(report.sleeps, 1);
    assert_eq!(start.elapsed(), POLL_INTERVAL);
    assert_eq!(
        client.downloads(),
        vec!["https://cdn/2.mp4", "https://cdn/1.mp4", "https://cdn/3.mp4"]
    );
    for id in 1..=3 {
        assert!(store.is_complete(&Artifact::Clip(id)));
        let record: JobRecord = store.read_json(&Artifact::JobRecord(id)).await.unwrap();
        assert!(record.done);
        assert_eq!(record.url, format!("https://cdn/{}.mp4", id));
        assert_eq!(record.processor, "Mock Avatar");
    }
    assert_eq!(client.deletes().len(), 3);
    assert_eq!(client.submits()[1].0, "Around Town, 2026-10-16, Take 2");
}

#[tokio::test(start_paused = true)]
async fn test_restart_redownloads_without_resubmitting() {
    let temp = tempfile::TempDir::new().unwrap();
    let store = ArtifactStore::open(temp.path()).unwrap();
    for id in 1..=3u32 {
        let mut record = JobRecord::submitted(id, "Mock Avatar", format!("job-{}", id), "t", "f");
        record.done = true;
        record.url = format!("https://cdn/{}.mp4", id);
        store
            .write_json(&Artifact::JobRecord(id), &record)
            .await
            .unwrap();
        if id != 2 {
            store.write_bytes(&Artifact::Clip(id), b"mp4").await.unwrap();
        }
    }
    let client = MockJobClient::default()
        .with_statuses("job-2", vec![completed("https://cdn/2-fresh.mp4")])
        .with_failing_download("https://cdn/2.mp4");
    let reconciler = JobReconciler::new(&client, &store, POLL_INTERVAL, 720);

    let report = reconciler.reconcile(&takes(&[1, 2, 3]), title).await.unwrap();

    assert_eq!(report.submitted, 0);
    assert_eq!(report.skipped, 3);
    assert!(client.submits().is_empty());
    assert!(client.uploads().is_empty());
    assert_eq!(client.status_queries(), vec!["job-2"]);
    assert_eq!(client.downloads(), vec!["https://cdn/2-fresh.mp4"]);
    assert_eq!(report.downloaded, 1);
    assert_eq!(report.sleeps, 0);
    assert!(store.is_complete(&Artifact::Clip(2)));
    let record: JobRecord = store.read_json(&Artifact::JobRecord(2)).await.unwrap();
    assert_eq!(record.url, "https://cdn/2-fresh.mp4");
}

#[tokio::test(start_paused = true)]
async fn test_redownload_falls_back_to_recorded_url() {
    let temp = tempfile::TempDir::new().unwrap();
    let store = ArtifactStore::open(temp.path()).unwrap();
    let mut record = JobRecord::submitted(1, "Mock Avatar", "job-1", "t", "f");
    record.done = true;
    record.url = "https://cdn/1.mp4".to_string();
    store
        .write_json(&Artifact::JobRecord(1), &record)
        .await
        .unwrap();
    let client = MockJobClient::default().with_statuses(
        "job-1",
        vec![Err(RenderErrorKind::Api {
            status_code: 502,
            message: "bad gateway".into(),
        })],
    );
    let reconciler = JobReconciler::new(&client, &store, POLL_INTERVAL, 720);

    let report = reconciler.reconcile(&takes(&[1]), title).await.unwrap();

    assert_eq!(client.status_queries(), vec!["job-1"]);
    assert_eq!(client.downloads(), vec!["https://cdn/1.mp4"]);
    assert_eq!(report.downloaded, 1);
    assert_eq!(report.rounds, 1);
    assert!(store.is_complete(&Artifact::Clip(1)));
}

#[tokio::test(start_paused = true)]
async fn test_failed_job_is_terminal() {
    let temp = tempfile::TempDir::new().unwrap();
    let store = ArtifactStore::open(temp.path()).unwrap();
    let client = MockJobClient::default()
        .with_statuses("job-1", vec![processing(), failed("avatar unavailable")])
        .with_statuses("job-2", vec![completed("https://cdn/2.mp4")]);
    let reconciler = JobReconciler::new(&client, &store, POLL_INTERVAL, 720);

    let report = reconciler.reconcile(&takes(&[1, 2]), title).await.unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.downloaded, 1);
    assert_eq!(report.rounds, 2);
    let record: JobRecord = store.read_json(&Artifact::JobRecord(1)).await.unwrap();
    assert!(!record.done);
    assert_eq!(record.failure.as_deref(), Some("avatar unavailable"));

    // A failed record is not polled again.
    let queries = client.status_queries().len();
    let mut report = bulletin_pipeline::ReconcileReport::default();
    reconciler.poll(&mut report).await.unwrap();
    assert_eq!(report.rounds, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(client.status_queries().len(), queries);
}

#[tokio::test(start_paused = true)]
async fn test_failed_record_resubmitted_on_next_invocation() {
    let temp = tempfile::TempDir::new().unwrap();
    let store = ArtifactStore::open(temp.path()).unwrap();
    let mut record = JobRecord::submitted(1, "Mock Avatar", "job-old", "t", "f");
    record.failure = Some("boom".to_string());
    store
        .write_json(&Artifact::JobRecord(1), &record)
        .await
        .unwrap();
    let client = MockJobClient::default()
        .with_statuses("job-1", vec![completed("https://cdn/1.mp4")]);
    let reconciler = JobReconciler::new(&client, &store, POLL_INTERVAL, 720);

    let report = reconciler.reconcile(&takes(&[1]), title).await.unwrap();

    assert_eq!(report.submitted, 1);
    let record: JobRecord = store.read_json(&Artifact::JobRecord(1)).await.unwrap();
    assert_eq!(record.video_id, "job-1");
    assert!(record.done);
    assert!(record.failure.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_poll_limit_exceeded() {
    let temp = tempfile::TempDir::new().unwrap();
    let store = ArtifactStore::open(temp.path()).unwrap();
    let client = MockJobClient::default().with_statuses("job-1", vec![processing()]);
    let reconciler = JobReconciler::new(&client, &store, POLL_INTERVAL, 3);
    let start = Instant::now();

    let err = reconciler
        .reconcile(&takes(&[1]), title)
        .await
        .unwrap_err();

    match err.kind() {
        BulletinErrorKind::Pipeline(e) => assert_eq!(
            e.kind,
            PipelineErrorKind::PollLimitExceeded {
                rounds: 3,
                pending: 1
            }
        ),
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(start.elapsed(), POLL_INTERVAL * 2);
}

#[tokio::test(start_paused = true)]
async fn test_unparsable_status_stays_pending() {
    let temp = tempfile::TempDir::new().unwrap();
    let store = ArtifactStore::open(temp.path()).unwrap();
    let client = MockJobClient::default().with_statuses(
        "job-1",
        vec![
            Err(RenderErrorKind::StatusUnparsable("<html>".into())),
            Err(RenderErrorKind::Api {
                status_code: 502,
                message: "bad gateway".into(),
            }),
            completed("https://cdn/1.mp4"),
        ],
    );
    let reconciler = JobReconciler::new(&client, &store, POLL_INTERVAL, 720);

    let report = reconciler.reconcile(&takes(&[1]), title).await.unwrap();

    assert_eq!(report.rounds, 3);
    assert_eq!(report.sleeps, 2);
    assert_eq!(report.downloaded, 1);
}

#[tokio::test(start_paused = true)]
async fn test_download_failure_retried_next_invocation() {
    let temp = tempfile::TempDir::new().unwrap();
    let store = ArtifactStore::open(temp.path()).unwrap();
    let client = MockJobClient::default()
        .with_statuses("job-1", vec![completed("https://cdn/1.mp4")])
        .with_failing_download("https://cdn/1.mp4");
    let reconciler = JobReconciler::new(&client, &store, POLL_INTERVAL, 720);

    let report = reconciler.reconcile(&takes(&[1]), title).await.unwrap();

    assert_eq!(report.download_failures, 1);
    assert_eq!(report.rounds, 1);
    assert_eq!(report.sleeps, 0);
    let record: JobRecord = store.read_json(&Artifact::JobRecord(1)).await.unwrap();
    assert!(record.done);
    assert!(!store.is_complete(&Artifact::Clip(1)));

    let client = MockJobClient::default();
    let reconciler = JobReconciler::new(&client, &store, POLL_INTERVAL, 720);
    let report = reconciler.reconcile(&takes(&[1]), title).await.unwrap();

    assert_eq!(report.downloaded, 1);
    assert!(client.submits().is_empty());
    assert!(store.is_complete(&Artifact::Clip(1)));
}

#[tokio::test(start_paused = true)]
async fn test_submission_failure_skips_only_that_take() {
    let temp = tempfile::TempDir::new().unwrap();
    let store = ArtifactStore::open(temp.path()).unwrap();
    let client = MockJobClient::default()
        .with_failing_upload("frame_2.jpg")
        .with_statuses("job-1", vec![completed("https://cdn/1.mp4")])
        .with_statuses("job-2", vec![completed("https://cdn/3.mp4")]);
    let reconciler = JobReconciler::new(&client, &store, POLL_INTERVAL, 720);

    let report = reconciler.reconcile(&takes(&[1, 2, 3]), title).await.unwrap();

    assert_eq!(report.submitted, 2);
    assert!(store.exists(&Artifact::JobRecord(1)));
    assert!(!store.exists(&Artifact::JobRecord(2)));
    assert!(store.exists(&Artifact::JobRecord(3)));
    assert_eq!(client.deletes().len(), 2);
    assert_eq!(report.downloaded, 2);
}
