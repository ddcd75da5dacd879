//! Shared state handed to every pipeline step.

use bulletin_core::Dimensions;
use bulletin_interface::{
    Compositor, ExtractionOracle, FrameGenerator, GenerationJobClient, PageFetcher,
};
use bulletin_storage::ArtifactStore;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// External services used by the steps.
#[derive(Clone)]
pub struct Services {
    /// Structured extraction and text generation
    pub oracle: Arc<dyn ExtractionOracle>,
    /// Web page retrieval
    pub fetcher: Arc<dyn PageFetcher>,
    /// Clip rendering jobs
    pub jobs: Arc<dyn GenerationJobClient>,
    /// Storyboard frame images
    pub frames: Arc<dyn FrameGenerator>,
    /// Final video assembly
    pub compositor: Arc<dyn Compositor>,
}

/// Tunables for one run.
///
/// # Examples
///
/// ```
/// use bulletin_pipeline::PipelineSettingsBuilder;
///
/// let settings = PipelineSettingsBuilder::default()
///     .backdrop("assets/backdrop.jpg")
///     .build()
///     .unwrap();
/// assert_eq!(settings.enrichment_workers(), &8);
/// ```
#[derive(Debug, Clone, PartialEq, derive_getters::Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct PipelineSettings {
    /// Model for research extraction
    #[builder(default = "\"gemini-2.5-flash-lite\".to_string()")]
    research_model: String,
    /// Model for the script
    #[builder(default = "\"gemini-2.5-flash\".to_string()")]
    script_model: String,
    /// Model for the social media post
    #[builder(default = "\"gemini-2.5-flash\".to_string()")]
    post_model: String,
    /// Show name used in job titles
    #[builder(default = "\"Around Town\".to_string()")]
    show_name: String,
    /// Title on the intro card
    #[builder(default = "\"Around Town with LMC\".to_string()")]
    intro_title: String,
    /// Episode label in job titles; the run date when unset
    #[builder(default)]
    episode: Option<String>,
    /// Output video dimensions
    #[builder(default = "Dimensions::new(720, 1280)")]
    dimensions: Dimensions,
    /// Background image for the opening and closing takes
    backdrop: PathBuf,
    /// Delay between job polling rounds
    #[builder(default = "Duration::from_secs(10)")]
    poll_interval: Duration,
    /// Polling rounds before giving up
    #[builder(default = "720")]
    max_poll_rounds: usize,
    /// Concurrent enrichment fetches per target
    #[builder(default = "8")]
    enrichment_workers: usize,
}

/// Everything a step needs to run.
#[derive(derive_getters::Getters)]
pub struct RunContext {
    /// Working directory store
    store: ArtifactStore,
    /// Date the run is for
    today: NaiveDate,
    /// External services
    services: Services,
    /// Run tunables
    settings: PipelineSettings,
}

impl RunContext {
    /// Assembles a context.
    pub fn new(
        store: ArtifactStore,
        today: NaiveDate,
        services: Services,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            store,
            today,
            services,
            settings,
        }
    }

    /// Episode label: the configured one, or the run date.
    pub fn episode(&self) -> String {
        self.settings
            .episode
            .clone()
            .unwrap_or_else(|| self.today.format("%Y-%m-%d").to_string())
    }
}
