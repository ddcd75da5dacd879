//! Core data types for the Bulletin content pipeline.
//!
//! These types are the records that flow between pipeline steps and the
//! shapes persisted to the artifact store.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod composition;
mod dates;
mod job;
mod phonetic;
mod record;
mod script;
mod storyboard;
mod target;
mod tokens;

pub use composition::{CompositionPlan, Segment, TitleOverlay, title_safe};
pub use dates::{DateRange, american_date, long_date};
pub use job::{JobRecord, JobStatus, JobStatusReport, Quota};
pub use phonetic::PhoneticReplacer;
pub use record::{EventsResult, ExtractedRecord};
pub use script::{Script, Story};
pub use storyboard::{Dimensions, Storyboard, Take};
pub use target::{CrawlStrategy, Target, TargetBuilder};
pub use tokens::{TokenLedger, TokenUsage};
