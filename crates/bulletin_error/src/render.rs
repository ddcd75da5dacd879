//! Rendering service (generation job) error types.

/// Kinds of rendering service errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RenderErrorKind {
    /// API key was not supplied
    #[display("Render service API key not configured")]
    MissingApiKey,
    /// Service returned a non-success status
    #[display("Render API error (HTTP {}): {}", status_code, message)]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Service message
        message: String,
    },
    /// Request never reached the service
    #[display("Render request failed: {}", _0)]
    Request(String),
    /// Asset upload failed
    #[display("Asset upload failed: {}", _0)]
    Upload(String),
    /// Status response could not be interpreted
    #[display("Unparsable job status: {}", _0)]
    StatusUnparsable(String),
    /// Output download failed
    #[display("Download failed: {}", _0)]
    Download(String),
    /// Service reported the job as failed
    #[display("Job {} failed: {}", job_id, message)]
    JobFailed {
        /// External job id
        job_id: String,
        /// Service message
        message: String,
    },
    /// Local composition or frame generation failed
    #[display("Composition failed: {}", _0)]
    Composition(String),
}

/// Render error with location tracking.
///
/// # Examples
///
/// ```
/// use bulletin_error::{RenderError, RenderErrorKind};
///
/// let err = RenderError::new(RenderErrorKind::Download("timeout".to_string()));
/// assert!(format!("{}", err).contains("Download failed"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Render Error: {} at line {} in {}", kind, line, file)]
pub struct RenderError {
    /// The kind of error that occurred
    pub kind: RenderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RenderError {
    /// Create a new render error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RenderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
