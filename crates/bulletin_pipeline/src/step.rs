//! The step abstraction.

use crate::RunContext;
use async_trait::async_trait;
use bulletin_error::BulletinResult;

/// Pipeline stages in execution order.
///
/// # Examples
///
/// ```
/// use bulletin_pipeline::StepKind;
///
/// assert!(StepKind::Research < StepKind::WritePost);
/// assert_eq!(StepKind::Film.to_string(), "film");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum StepKind {
    /// Crawl targets and merge datasets
    Research,
    /// Write the episode script
    WriteScript,
    /// Generate frames and lay out takes
    Storyboard,
    /// Render one clip per take
    Film,
    /// Compose the final video
    Produce,
    /// Write the social media post
    WritePost,
}

/// One idempotent, resumable unit of work.
///
/// `done` must be a synchronous check of the working directory with no side
/// effects. `run` overwrites the step's artifact even when `done` is true.
#[async_trait]
pub trait PipelineStep: Send + Sync {
    /// Which stage this is.
    fn kind(&self) -> StepKind;

    /// Whether the step's artifact is complete.
    fn done(&self, ctx: &RunContext) -> bool;

    /// Produce the step's artifact.
    async fn run(&self, ctx: &RunContext) -> BulletinResult<()>;
}
