//! Error types for the Bulletin pipeline.
//!
//! Every crate in the workspace reports failures through the types defined here.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use bulletin_error::{BulletinResult, FetchError};
//!
//! fn fetch_page(url: &str) -> BulletinResult<String> {
//!     Err(FetchError::new(url, "Connection refused"))?
//! }
//!
//! assert!(fetch_page("https://x.org").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod fetch;
mod json;
mod oracle;
mod pipeline;
mod render;
mod storage;

pub use config::ConfigError;
pub use error::{BulletinError, BulletinErrorKind, BulletinResult};
pub use fetch::FetchError;
pub use json::JsonError;
pub use oracle::{OracleError, OracleErrorKind, OracleResult, RetryableError};
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use render::{RenderError, RenderErrorKind};
pub use storage::{StorageError, StorageErrorKind};
