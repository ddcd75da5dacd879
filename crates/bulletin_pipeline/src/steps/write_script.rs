use super::require;
use crate::prompts::{self, render};
use crate::{PipelineStep, RunContext, StepKind};
use async_trait::async_trait;
use bulletin_core::{ExtractedRecord, Script, long_date};
use bulletin_error::{BulletinResult, JsonError};
use bulletin_interface::extract;
use bulletin_storage::Artifact;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

/// Default number of stories per episode.
pub const DEFAULT_STORY_COUNT: usize = 4;

/// Asks the oracle for the episode script.
pub struct WriteScriptStep {
    num_stories: usize,
    recent_dirs: Vec<PathBuf>,
}

impl WriteScriptStep {
    /// Write a script with `num_stories` stories, avoiding events featured in
    /// the scripts found in `recent_dirs`.
    pub fn new(num_stories: usize, recent_dirs: Vec<PathBuf>) -> Self {
        Self {
            num_stories,
            recent_dirs,
        }
    }

    async fn recent_scripts(&self) -> Vec<Script> {
        let mut scripts = Vec::new();
        for dir in &self.recent_dirs {
            let path = dir.join(Artifact::Script.file_name());
            let Ok(bytes) = tokio::fs::read(&path).await else {
                continue;
            };
            match serde_json::from_slice(&bytes) {
                Ok(script) => scripts.push(script),
                Err(e) => warn!(path = %path.display(), error = %e, "Ignoring unreadable recent script"),
            }
        }
        scripts
    }
}

#[async_trait]
impl PipelineStep for WriteScriptStep {
    fn kind(&self) -> StepKind {
        StepKind::WriteScript
    }

    fn done(&self, ctx: &RunContext) -> bool {
        ctx.store().is_complete(&Artifact::Script)
    }

    #[instrument(skip_all, fields(num_stories = self.num_stories))]
    async fn run(&self, ctx: &RunContext) -> BulletinResult<()> {
        let store = ctx.store();
        let events: Vec<ExtractedRecord> = require(store, &Artifact::Events).await?;
        info!(events = events.len(), "Loaded events to write script");

        let recent = self.recent_scripts().await;
        debug!(recent_scripts = recent.len(), "Loaded recent scripts");

        let events_json =
            serde_json::to_string_pretty(&events).map_err(|e| JsonError::new(e.to_string()))?;
        let recent_json =
            serde_json::to_string_pretty(&recent).map_err(|e| JsonError::new(e.to_string()))?;
        let date = long_date(*ctx.today());
        let num_events = self.num_stories.to_string();
        let prompt = render(
            prompts::SCRIPT_WRITER,
            &[
                ("date", date.as_str()),
                ("num_events", num_events.as_str()),
                ("events", events_json.as_str()),
                ("recent_scripts", recent_json.as_str()),
            ],
        );

        let script = extract::<Script>(
            ctx.services().oracle.as_ref(),
            ctx.settings().script_model(),
            prompt,
        )
        .await?;

        if script.value.stories.len() != self.num_stories {
            warn!(
                requested = self.num_stories,
                written = script.value.stories.len(),
                "Script story count differs from request"
            );
        }

        store.write_json(&Artifact::Script, &script.value).await?;
        info!(stories = script.value.stories.len(), total_tokens = script.usage.total, "Script written");
        Ok(())
    }
}
