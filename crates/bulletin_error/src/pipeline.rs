//! Pipeline step and orchestration error types.

/// Kinds of pipeline errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// A target could not be crawled as configured
    #[display("Target '{}' is invalid: {}", target, reason)]
    TargetConfigInvalid {
        /// Target name
        target: String,
        /// What is wrong with it
        reason: String,
    },
    /// A step's input artifact is absent
    #[display("Missing artifact: {}", _0)]
    MissingArtifact(String),
    /// The merge found no per-target datasets
    #[display("No per-target datasets to merge")]
    NoDatasets,
    /// Output dimensions are not a supported aspect ratio
    #[display("Dimensions {}x{} are not 16:9 or 9:16", width, height)]
    DimensionsInvalid {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
    /// Polling gave up with jobs still pending
    #[display("Gave up after {} poll rounds with {} jobs pending", rounds, pending)]
    PollLimitExceeded {
        /// Rounds completed
        rounds: usize,
        /// Jobs still pending
        pending: usize,
    },
    /// One or more jobs ended in the failed state
    #[display("{} generation jobs failed", _0)]
    JobsFailed(usize),
    /// Finished clips could not be downloaded
    #[display("{} clip downloads failed; run the step again to retry", _0)]
    DownloadsFailed(usize),
    /// Pre-run environment check failed
    #[display("Setup check failed: {}", _0)]
    SetupCheck(String),
}

/// Pipeline error with location tracking.
///
/// # Examples
///
/// ```
/// use bulletin_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::MissingArtifact("script.json".into()));
/// assert!(format!("{}", err).contains("script.json"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The kind of error that occurred
    pub kind: PipelineErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new pipeline error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
