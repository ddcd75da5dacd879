//! Trait definitions for the external services the Bulletin pipeline calls.
//!
//! Concrete clients live in `bulletin_models`; pipeline steps depend only on
//! these traits so tests can substitute scripted fakes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod oracle;
mod schema;
mod traits;

pub use oracle::{Extracted, OracleRequest, OracleResponse, extract, generate_text};
pub use schema::response_schema;
pub use traits::{Compositor, ExtractionOracle, FrameGenerator, GenerationJobClient, PageFetcher};
