//! Configuration error types.

/// Configuration error with source location.
///
/// Raised when the layered configuration cannot be loaded or a required
/// setting (such as an API key) is missing.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use bulletin_error::ConfigError;
    ///
    /// let err = ConfigError::new("HEYGEN_API_KEY not set");
    /// assert!(format!("{}", err).contains("HEYGEN_API_KEY"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
