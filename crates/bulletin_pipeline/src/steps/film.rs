use super::require;
use crate::{JobReconciler, PipelineStep, RunContext, StepKind};
use async_trait::async_trait;
use bulletin_core::{PhoneticReplacer, Storyboard, Take};
use bulletin_error::{BulletinResult, PipelineError, PipelineErrorKind};
use bulletin_storage::Artifact;
use tracing::{info, instrument, warn};

/// Renders one clip per storyboard take through the job reconciler.
pub struct FilmStep {
    takes_filter: Vec<u32>,
    pronunciation: PhoneticReplacer,
}

impl FilmStep {
    /// Film the takes in `takes_filter`, or every take when it is empty.
    ///
    /// Spoken text passes through `pronunciation` before submission.
    pub fn new(takes_filter: Vec<u32>, pronunciation: PhoneticReplacer) -> Self {
        Self {
            takes_filter,
            pronunciation,
        }
    }

    fn selected(&self, storyboard: Storyboard) -> Vec<Take> {
        storyboard
            .takes
            .into_iter()
            .filter(|take| self.takes_filter.is_empty() || self.takes_filter.contains(&take.id))
            .map(|mut take| {
                take.text = self.pronunciation.replace(&take.text);
                take
            })
            .collect()
    }
}

#[async_trait]
impl PipelineStep for FilmStep {
    fn kind(&self) -> StepKind {
        StepKind::Film
    }

    fn done(&self, ctx: &RunContext) -> bool {
        let store = ctx.store();
        let Ok(storyboard) = store.read_json_sync::<Storyboard>(&Artifact::Storyboard) else {
            return false;
        };
        storyboard
            .takes
            .iter()
            .all(|take| store.is_complete(&Artifact::Clip(take.id)))
    }

    #[instrument(skip_all, fields(takes_filter = ?self.takes_filter))]
    async fn run(&self, ctx: &RunContext) -> BulletinResult<()> {
        let store = ctx.store();
        let settings = ctx.settings();
        let storyboard: Storyboard = require(store, &Artifact::Storyboard).await?;
        let takes = self.selected(storyboard);
        if takes.is_empty() {
            warn!("No storyboard takes selected");
        }

        let show = settings.show_name().clone();
        let episode = ctx.episode();
        let reconciler = JobReconciler::new(
            ctx.services().jobs.as_ref(),
            store,
            *settings.poll_interval(),
            *settings.max_poll_rounds(),
        );
        let report = reconciler
            .reconcile(&takes, |id| format!("{}, {}, Take {}", show, episode, id))
            .await?;

        if report.failed > 0 {
            return Err(PipelineError::new(PipelineErrorKind::JobsFailed(report.failed)).into());
        }
        if report.download_failures > 0 {
            warn!(failures = report.download_failures, "Clip downloads failed");
            return Err(PipelineError::new(PipelineErrorKind::DownloadsFailed(
                report.download_failures,
            ))
            .into());
        }
        info!(downloaded = report.downloaded, "Filming finished");
        Ok(())
    }
}
