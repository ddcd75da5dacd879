use super::require;
use crate::prompts::{self, render};
use crate::{PipelineStep, RunContext, StepKind};
use async_trait::async_trait;
use bulletin_core::{Script, Storyboard, Take};
use bulletin_error::BulletinResult;
use bulletin_storage::Artifact;
use tracing::{info, instrument};

/// Generates one frame per story and lays out the takes.
///
/// Take 0 is the opening and the last take the closing; both use the
/// configured backdrop. Takes in between are the stories, in script order.
#[derive(Debug, Default)]
pub struct StoryboardStep;

impl StoryboardStep {
    /// Creates the step.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PipelineStep for StoryboardStep {
    fn kind(&self) -> StepKind {
        StepKind::Storyboard
    }

    fn done(&self, ctx: &RunContext) -> bool {
        ctx.store().is_complete(&Artifact::Storyboard)
    }

    #[instrument(skip_all)]
    async fn run(&self, ctx: &RunContext) -> BulletinResult<()> {
        let store = ctx.store();
        let settings = ctx.settings();
        let script: Script = require(store, &Artifact::Script).await?;
        let aspect_ratio = settings.dimensions().aspect_ratio()?;
        let backdrop = settings.backdrop().display().to_string();
        info!(stories = script.stories.len(), aspect_ratio, "Loaded script");

        let mut takes = Vec::with_capacity(script.stories.len() + 2);
        takes.push(Take::plain(0, script.opening.clone(), backdrop.clone()));

        let total = script.stories.len();
        for (index, story) in script.stories.iter().enumerate() {
            let id = index as u32 + 1;
            let frame = Artifact::Frame(id);
            let prompt = render(
                prompts::BACKGROUND,
                &[("background_description", story.image_desc.as_str())],
            );

            info!(frame = id, total, "Generating frame");
            ctx.services()
                .frames
                .generate_frame(&prompt, aspect_ratio, &store.staging_path(&frame))
                .await?;
            store.commit_staged(&frame).await?;

            takes.push(Take {
                id,
                text: story.text.clone(),
                frame: store.path(&frame).display().to_string(),
                title: Some(story.title.clone()),
                when: Some(story.when.clone()),
                where_: Some(story.where_.clone()),
            });
        }

        takes.push(Take::plain(total as u32 + 1, script.closing.clone(), backdrop));

        let storyboard = Storyboard { takes };
        store.write_json(&Artifact::Storyboard, &storyboard).await?;
        info!(takes = storyboard.takes.len(), "Wrote storyboard");
        Ok(())
    }
}
