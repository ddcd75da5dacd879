//! Provider clients for the Bulletin pipeline.
//!
//! Each client implements one or more traits from `bulletin_interface`:
//!
//! | Client | Traits |
//! |---|---|
//! | [`GeminiClient`] | `ExtractionOracle`, `FrameGenerator` |
//! | [`HeyGenClient`] | `GenerationJobClient` |
//! | [`HttpPageFetcher`] | `PageFetcher` |
//! | [`FfmpegCompositor`] | `Compositor` |
//!
//! API keys are passed in by the caller; nothing here reads the environment.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod compose;
mod fetch;
mod gemini;
mod heygen;

pub use compose::FfmpegCompositor;
pub use fetch::{HttpPageFetcher, simplify_html};
pub use gemini::GeminiClient;
pub use heygen::{HeyGenClient, HeyGenSettings};
