//! Top-level error wrapper types.

use crate::{
    ConfigError, FetchError, JsonError, OracleError, PipelineError, RenderError, StorageError,
};

/// Every error the pipeline can surface.
///
/// # Examples
///
/// ```
/// use bulletin_error::{BulletinError, BulletinErrorKind, FetchError};
///
/// let err: BulletinError = FetchError::new("https://x.org", "Connection failed").into();
/// assert!(matches!(err.kind(), BulletinErrorKind::Fetch(_)));
/// assert!(format!("{}", err).contains("Fetch Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum BulletinErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Page fetch error
    #[from(FetchError)]
    Fetch(FetchError),
    /// Artifact storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Extraction oracle error
    #[from(OracleError)]
    Oracle(OracleError),
    /// Rendering service error
    #[from(RenderError)]
    Render(RenderError),
    /// Pipeline error
    #[from(PipelineError)]
    Pipeline(PipelineError),
}

/// Bulletin error with kind discrimination.
///
/// # Examples
///
/// ```
/// use bulletin_error::{BulletinResult, ConfigError};
///
/// fn might_fail() -> BulletinResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Bulletin Error: {}", _0)]
pub struct BulletinError(Box<BulletinErrorKind>);

impl BulletinError {
    /// Create a new error from a kind.
    pub fn new(kind: BulletinErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BulletinErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to BulletinErrorKind
impl<T> From<T> for BulletinError
where
    T: Into<BulletinErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Bulletin operations.
pub type BulletinResult<T> = std::result::Result<T, BulletinError>;
