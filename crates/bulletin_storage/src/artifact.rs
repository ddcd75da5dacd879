//! Named artifact slots.

/// A fixed-name output inside a working directory.
///
/// # Examples
///
/// ```
/// use bulletin_storage::Artifact;
///
/// assert_eq!(Artifact::TargetEvents("library".into()).file_name(), "events_library.json");
/// assert_eq!(Artifact::Clip(3).file_name(), "clip_3.mp4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum Artifact {
    /// Merged research dataset
    #[display("events.json")]
    Events,
    /// One target's research dataset
    #[display("events_{}.json", _0)]
    TargetEvents(String),
    /// Research token ledger
    #[display("research_tokens.json")]
    ResearchTokens,
    /// Episode script
    #[display("script.json")]
    Script,
    /// Episode storyboard
    #[display("storyboard.json")]
    Storyboard,
    /// Generated background frame for a story
    #[display("generated_frame_{}.jpg", _0)]
    Frame(u32),
    /// Durable record of one take's generation job
    #[display("clip_{}.json", _0)]
    JobRecord(u32),
    /// Rendered clip for one take
    #[display("clip_{}.mp4", _0)]
    Clip(u32),
    /// Final composed video
    #[display("video.mp4")]
    Video,
    /// Social media post text
    #[display("post.txt")]
    Post,
}

pub(crate) const TARGET_EVENTS_PREFIX: &str = "events_";
pub(crate) const JOB_RECORD_PREFIX: &str = "clip_";
pub(crate) const JSON_SUFFIX: &str = ".json";

impl Artifact {
    /// File name within the working directory.
    pub fn file_name(&self) -> String {
        self.to_string()
    }
}
