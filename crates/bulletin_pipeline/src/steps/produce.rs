use super::require;
use crate::{PipelineStep, RunContext, StepKind};
use async_trait::async_trait;
use bulletin_core::{CompositionPlan, Segment, Storyboard, Take, TitleOverlay, long_date, title_safe};
use bulletin_error::{BulletinResult, PipelineError, PipelineErrorKind};
use bulletin_storage::{Artifact, ArtifactStore};
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Title card text for the last take.
const OUTRO_TITLE: &str = "Thanks for Watching";
const OUTRO_SUBTITLE: &str = "See you tomorrow!";

/// Composes the clips into the final video.
#[derive(Debug, Default)]
pub struct ProduceStep;

impl ProduceStep {
    /// Creates the step.
    pub fn new() -> Self {
        Self
    }
}

fn event_info(take: &Take) -> TitleOverlay {
    let safe = |field: &Option<String>| title_safe(field.as_deref().unwrap_or_default());
    TitleOverlay::EventInfo {
        name: safe(&take.title),
        when: safe(&take.when),
        where_: safe(&take.where_),
    }
}

/// Builds the plan: intro card, one event overlay per story, outro card.
pub fn composition_plan(
    store: &ArtifactStore,
    storyboard: &Storyboard,
    intro_title: &str,
    today: NaiveDate,
    output: PathBuf,
) -> Result<CompositionPlan, PipelineError> {
    let last = storyboard.takes.len().saturating_sub(1);
    let mut segments = Vec::with_capacity(storyboard.takes.len());

    for (index, take) in storyboard.takes.iter().enumerate() {
        let clip = Artifact::Clip(take.id);
        if !store.is_complete(&clip) {
            return Err(PipelineError::new(PipelineErrorKind::MissingArtifact(clip.file_name())));
        }

        let overlay = if index == 0 {
            TitleOverlay::Card {
                title: intro_title.to_string(),
                subtitle: format!("For {}", long_date(today)),
            }
        } else if index == last {
            TitleOverlay::Card {
                title: OUTRO_TITLE.to_string(),
                subtitle: OUTRO_SUBTITLE.to_string(),
            }
        } else {
            event_info(take)
        };

        segments.push(Segment {
            clip: store.path(&clip),
            overlay,
        });
    }

    Ok(CompositionPlan { segments, output })
}

#[async_trait]
impl PipelineStep for ProduceStep {
    fn kind(&self) -> StepKind {
        StepKind::Produce
    }

    fn done(&self, ctx: &RunContext) -> bool {
        ctx.store().is_complete(&Artifact::Video)
    }

    #[instrument(skip_all)]
    async fn run(&self, ctx: &RunContext) -> BulletinResult<()> {
        let store = ctx.store();
        let storyboard: Storyboard = require(store, &Artifact::Storyboard).await?;
        if storyboard.takes.is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::MissingArtifact(
                "storyboard takes".to_string(),
            ))
            .into());
        }

        let plan = composition_plan(
            store,
            &storyboard,
            ctx.settings().intro_title(),
            *ctx.today(),
            store.staging_path(&Artifact::Video),
        )?;

        info!(segments = plan.segments.len(), "Composing video");
        ctx.services().compositor.compose(&plan).await?;
        store.commit_staged(&Artifact::Video).await?;
        info!(path = %store.path(&Artifact::Video).display(), "Wrote video");
        Ok(())
    }
}
