//! Bulletin: a resumable pipeline that turns local event calendars into a
//! narrated short video and a social media post.
//!
//! # Architecture
//!
//! Bulletin is organized as a workspace with focused crates:
//!
//! - `bulletin_error` - Error types
//! - `bulletin_core` - Data model (records, scripts, storyboards, job records)
//! - `bulletin_interface` - Service traits and typed oracle helpers
//! - `bulletin_rate_limit` - Oracle quotas and overload retry
//! - `bulletin_storage` - Working directory artifact store
//! - `bulletin_models` - Gemini, HeyGen, page fetching and ffmpeg clients
//! - `bulletin_pipeline` - Crawler, job reconciler, steps and orchestrator
//!
//! This crate re-exports them and adds configuration loading and logging
//! setup for the `bulletin` binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
mod logging;

pub use config::{BulletinConfig, OracleConfig, PipelineConfig, RenderConfig, api_key};
pub use logging::{LOG_FILE, default_filter, init_logging};

pub use bulletin_core::*;
pub use bulletin_error::*;
pub use bulletin_interface::*;
pub use bulletin_models::*;
pub use bulletin_pipeline::*;
pub use bulletin_rate_limit::*;
pub use bulletin_storage::*;
