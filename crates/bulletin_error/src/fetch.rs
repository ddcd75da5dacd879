//! Page fetch error types.

/// Failure to retrieve or simplify a web page.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Fetch Error: {} ({}) at line {} in {}", message, url, line, file)]
pub struct FetchError {
    /// The page that could not be fetched
    pub url: String,
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl FetchError {
    /// Create a new FetchError for `url` at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use bulletin_error::FetchError;
    ///
    /// let err = FetchError::new("https://x.org", "HTTP 404");
    /// assert!(format!("{}", err).contains("https://x.org"));
    /// ```
    #[track_caller]
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            url: url.into(),
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
