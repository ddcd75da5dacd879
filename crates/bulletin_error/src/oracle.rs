//! Extraction oracle error types and retry classification.

/// Oracle-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum OracleErrorKind {
    /// API key was not supplied
    #[display("Oracle API key not configured")]
    MissingApiKey,
    /// Provider is overloaded or rate limiting (HTTP 429 / 503)
    #[display("Oracle overloaded (HTTP {}): {}", status_code, message)]
    Overloaded {
        /// HTTP status code
        status_code: u16,
        /// Provider message
        message: String,
    },
    /// Provider rejected the request
    #[display("Oracle API error (HTTP {}): {}", status_code, message)]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Provider message
        message: String,
    },
    /// Request could not be sent
    #[display("Oracle request failed: {}", _0)]
    Request(String),
    /// Response carried no usable candidate
    #[display("Oracle returned an empty response")]
    EmptyResponse,
    /// Response did not match the requested schema
    #[display("Oracle response did not match schema: {}", _0)]
    InvalidResponse(String),
}

impl OracleErrorKind {
    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OracleErrorKind::Overloaded { .. })
    }

    /// Map an HTTP failure status onto an error kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use bulletin_error::OracleErrorKind;
    ///
    /// assert!(OracleErrorKind::from_status(503, "busy").is_retryable());
    /// assert!(!OracleErrorKind::from_status(400, "bad").is_retryable());
    /// ```
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            429 | 503 => OracleErrorKind::Overloaded {
                status_code,
                message,
            },
            _ => OracleErrorKind::Api {
                status_code,
                message,
            },
        }
    }
}

/// Oracle error with source location tracking.
///
/// # Examples
///
/// ```
/// use bulletin_error::{OracleError, OracleErrorKind};
///
/// let err = OracleError::new(OracleErrorKind::MissingApiKey);
/// assert!(format!("{}", err).contains("API key"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Oracle Error: {} at line {} in {}", kind, line, file)]
pub struct OracleError {
    /// The kind of error that occurred
    pub kind: OracleErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl OracleError {
    /// Create a new OracleError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: OracleErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for oracle calls.
pub type OracleResult<T> = std::result::Result<T, OracleError>;

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use bulletin_error::{OracleError, OracleErrorKind, RetryableError};
///
/// let err = OracleError::new(OracleErrorKind::Overloaded {
///     status_code: 503,
///     message: "The model is overloaded".to_string(),
/// });
/// assert!(err.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    ///
    /// Only transient provider overload qualifies. Malformed requests and
    /// schema mismatches fail immediately.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for OracleError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
