//! Tests for the artifact store.

use bulletin_core::{JobRecord, Script};
use bulletin_storage::{Artifact, ArtifactState, ArtifactStore};
use tempfile::TempDir;

fn script() -> Script {
    Script {
        opening: "Good morning!".to_string(),
        stories: vec![],
        closing: "See you tomorrow!".to_string(),
    }
}

#[tokio::test]
async fn test_write_and_read_json() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(temp_dir.path()).unwrap();

    store.write_json(&Artifact::Script, &script()).await.unwrap();

    let read: Script = store.read_json(&Artifact::Script).await.unwrap();
    assert_eq!(read, script());
    assert!(store.is_complete(&Artifact::Script));

    let manifest = store.manifest().unwrap();
    let entry = manifest.get("script.json").unwrap();
    assert_eq!(entry.state, ArtifactState::Complete);
    assert_eq!(entry.sha256.as_ref().map(String::len), Some(64));
}

#[tokio::test]
async fn test_file_without_manifest_entry_is_not_complete() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(temp_dir.path()).unwrap();

    std::fs::write(store.path(&Artifact::Post), "half written").unwrap();

    assert!(store.exists(&Artifact::Post));
    assert!(!store.is_complete(&Artifact::Post));
}

#[tokio::test]
async fn test_in_progress_entry_is_not_complete() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(temp_dir.path()).unwrap();

    store.write_text(&Artifact::Post, "first").await.unwrap();
    store.begin(&Artifact::Post).await.unwrap();

    assert!(!store.is_complete(&Artifact::Post));
}

#[tokio::test]
async fn test_deleted_file_is_not_complete() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(temp_dir.path()).unwrap();

    store.write_text(&Artifact::Post, "post").await.unwrap();
    std::fs::remove_file(store.path(&Artifact::Post)).unwrap();

    assert!(!store.is_complete(&Artifact::Post));
}

#[tokio::test]
async fn test_commit_staged_moves_file_into_place() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(temp_dir.path()).unwrap();
    let clip = Artifact::Clip(2);

    store.begin(&clip).await.unwrap();
    std::fs::write(store.staging_path(&clip), b"mp4 bytes").unwrap();
    assert!(!store.is_complete(&clip));

    store.commit_staged(&clip).await.unwrap();

    assert!(store.is_complete(&clip));
    assert!(!store.staging_path(&clip).exists());
    assert_eq!(store.read_bytes(&clip).await.unwrap(), b"mp4 bytes");
}

#[tokio::test]
async fn test_target_datasets_sorted_and_filtered() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(temp_dir.path()).unwrap();

    store
        .write_json(&Artifact::TargetEvents("zoo".into()), &Vec::<u8>::new())
        .await
        .unwrap();
    store
        .write_json(&Artifact::TargetEvents("library".into()), &Vec::<u8>::new())
        .await
        .unwrap();
    store.write_json(&Artifact::Events, &Vec::<u8>::new()).await.unwrap();
    std::fs::write(temp_dir.path().join("events_partial.json.part"), "[]").unwrap();

    let targets = store.target_datasets().await.unwrap();
    assert_eq!(targets, vec!["library".to_string(), "zoo".to_string()]);
}

#[tokio::test]
async fn test_job_records_ordered_by_take() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(temp_dir.path()).unwrap();

    for take in [10u32, 2, 0] {
        let record = JobRecord::submitted(take, "mock", format!("job-{take}"), "text", "frame.jpg");
        store
            .write_json(&Artifact::JobRecord(take), &record)
            .await
            .unwrap();
    }

    let records = store.job_records().await.unwrap();
    let takes: Vec<u32> = records.iter().map(|r| r.clip).collect();
    assert_eq!(takes, vec![0, 2, 10]);
}

#[tokio::test]
async fn test_corrupt_json_reports_artifact() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(temp_dir.path()).unwrap();
    store.write_text(&Artifact::Script, "not json").await.unwrap();

    let err = store.read_json::<Script>(&Artifact::Script).await.unwrap_err();
    assert!(err.to_string().contains("script.json"));
}
