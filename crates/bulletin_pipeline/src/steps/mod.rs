//! The six concrete pipeline steps.

mod film;
mod produce;
mod research;
mod storyboard;
mod write_post;
mod write_script;

pub use film::FilmStep;
pub use produce::{ProduceStep, composition_plan};
pub use research::ResearchStep;
pub use storyboard::StoryboardStep;
pub use write_post::WritePostStep;
pub use write_script::{DEFAULT_STORY_COUNT, WriteScriptStep};

use bulletin_error::{BulletinResult, PipelineError, PipelineErrorKind};
use bulletin_storage::{Artifact, ArtifactStore};
use serde::de::DeserializeOwned;

/// Reads a step's input, reporting an absent file as `MissingArtifact`.
async fn require<T: DeserializeOwned>(store: &ArtifactStore, artifact: &Artifact) -> BulletinResult<T> {
    if !store.exists(artifact) {
        return Err(PipelineError::new(PipelineErrorKind::MissingArtifact(artifact.file_name())).into());
    }
    store.read_json(artifact).await
}
