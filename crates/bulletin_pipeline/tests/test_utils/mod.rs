//! Test utilities for pipeline tests.

#![allow(dead_code)]

mod mock_fetcher;
mod mock_jobs;
mod mock_media;
mod mock_oracle;

pub use mock_fetcher::MockFetcher;
pub use mock_jobs::{MockJobClient, completed, failed, processing};
pub use mock_media::{MockCompositor, MockFrames};
pub use mock_oracle::{MOCK_USAGE, ScriptedOracle};

use bulletin_pipeline::{PipelineSettingsBuilder, RunContext, Services};
use bulletin_storage::ArtifactStore;
use chrono::NaiveDate;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Delay between polling rounds in tests.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// The fixed run date.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

/// Services with default media fakes.
pub fn services(
    oracle: Arc<ScriptedOracle>,
    fetcher: Arc<MockFetcher>,
    jobs: Arc<MockJobClient>,
) -> Services {
    Services {
        oracle,
        fetcher,
        jobs,
        frames: Arc::new(MockFrames::default()),
        compositor: Arc::new(MockCompositor::default()),
    }
}

/// A context over `dir` with test settings.
pub fn context(dir: &Path, services: Services) -> RunContext {
    let settings = PipelineSettingsBuilder::default()
        .backdrop(dir.join("backdrop.jpg"))
        .poll_interval(POLL_INTERVAL)
        .max_poll_rounds(5usize)
        .build()
        .unwrap();
    RunContext::new(ArtifactStore::open(dir).unwrap(), today(), services, settings)
}
