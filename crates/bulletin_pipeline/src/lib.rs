//! Pipeline engine for the Bulletin event video.
//!
//! Six resumable steps turn configured web sources into a finished video:
//!
//! ```text
//! research → write_script → storyboard → film → produce → write_post
//! ```
//!
//! Each step writes one artifact into the run's working directory and reports
//! `done` when that artifact is complete, so an interrupted run resumes where
//! it stopped. The [`Orchestrator`] decides which steps run.
//!
//! - [`Crawler`] realizes research: seed-page extraction plus bounded,
//!   order-preserving enrichment of each record from its own page.
//! - [`JobReconciler`] realizes filming: durable per-take job records and a
//!   polling loop that survives restarts without resubmitting.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod context;
mod crawler;
mod orchestrator;
pub mod prompts;
mod reconciler;
mod setup;
mod step;
pub mod steps;

pub use context::{PipelineSettings, PipelineSettingsBuilder, RunContext, Services};
pub use crawler::{CrawlOutcome, Crawler, normalize_link};
pub use orchestrator::{Orchestrator, RunSummary};
pub use reconciler::{JobReconciler, ReconcileReport};
pub use setup::check_setup;
pub use step::{PipelineStep, StepKind};
pub use steps::{
    FilmStep, ProduceStep, ResearchStep, StoryboardStep, WritePostStep, WriteScriptStep,
};
