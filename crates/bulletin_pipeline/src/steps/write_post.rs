use super::require;
use crate::prompts::{self, render};
use crate::{PipelineStep, RunContext, StepKind};
use async_trait::async_trait;
use bulletin_core::{Script, long_date};
use bulletin_error::{BulletinResult, JsonError};
use bulletin_interface::generate_text;
use bulletin_storage::Artifact;
use tracing::{info, instrument};

/// Writes social media copy from the script.
#[derive(Debug, Default)]
pub struct WritePostStep;

impl WritePostStep {
    /// Creates the step.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PipelineStep for WritePostStep {
    fn kind(&self) -> StepKind {
        StepKind::WritePost
    }

    fn done(&self, ctx: &RunContext) -> bool {
        ctx.store().is_complete(&Artifact::Post)
    }

    #[instrument(skip_all)]
    async fn run(&self, ctx: &RunContext) -> BulletinResult<()> {
        let store = ctx.store();
        let script: Script = require(store, &Artifact::Script).await?;
        let script_json =
            serde_json::to_string_pretty(&script).map_err(|e| JsonError::new(e.to_string()))?;
        let date = long_date(*ctx.today());
        let prompt = render(
            prompts::SOCIAL_POST,
            &[("date", date.as_str()), ("script", script_json.as_str())],
        );

        let post = generate_text(
            ctx.services().oracle.as_ref(),
            ctx.settings().post_model(),
            prompt,
        )
        .await?;

        store.write_text(&Artifact::Post, post.value.trim()).await?;
        info!(chars = post.value.len(), "Post written");
        Ok(())
    }
}
