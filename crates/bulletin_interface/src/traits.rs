//! Service traits.

use crate::{OracleRequest, OracleResponse};
use async_trait::async_trait;
use bulletin_core::{CompositionPlan, JobStatusReport, Quota};
use bulletin_error::{FetchError, OracleResult, RenderError};
use std::path::Path;

/// Retrieves a web page and reduces it to readable text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return its simplified text.
    ///
    /// With `use_dynamic_render`, the page is rendered in a headless browser
    /// first so script-built content is included.
    async fn fetch_simplified(&self, url: &str, use_dynamic_render: bool)
    -> Result<String, FetchError>;
}

/// A structured-extraction and text-generation service.
#[async_trait]
pub trait ExtractionOracle: Send + Sync {
    /// Send one prompt, optionally constrained to a JSON schema.
    async fn generate(&self, request: &OracleRequest) -> OracleResult<OracleResponse>;

    /// Names of the models this service offers.
    async fn available_models(&self) -> OracleResult<Vec<String>>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;
}

/// An asynchronous rendering service that turns text and an image into a clip.
#[async_trait]
pub trait GenerationJobClient: Send + Sync {
    /// Remaining rendering quota.
    async fn check_quota(&self) -> Result<Quota, RenderError>;

    /// Upload a local image and return the service's asset id.
    async fn upload_asset(&self, path: &Path) -> Result<String, RenderError>;

    /// Submit a job and return its external id.
    async fn submit_job(
        &self,
        title: &str,
        text: &str,
        asset_id: &str,
    ) -> Result<String, RenderError>;

    /// Current status of a job.
    async fn job_status(&self, job_id: &str) -> Result<JobStatusReport, RenderError>;

    /// Download a finished job's output to `dest`.
    async fn download(&self, url: &str, dest: &Path) -> Result<(), RenderError>;

    /// Delete an uploaded asset.
    async fn delete_asset(&self, asset_id: &str) -> Result<(), RenderError>;

    /// Processor label written into job records.
    fn processor_name(&self) -> &'static str;
}

/// Generates a still background frame from a description.
#[async_trait]
pub trait FrameGenerator: Send + Sync {
    /// Write an image matching `description` at `aspect_ratio` to `dest`.
    async fn generate_frame(
        &self,
        description: &str,
        aspect_ratio: &str,
        dest: &Path,
    ) -> Result<(), RenderError>;
}

/// Assembles finished clips into the final video.
#[async_trait]
pub trait Compositor: Send + Sync {
    /// Render `plan` to `plan.output`.
    async fn compose(&self, plan: &CompositionPlan) -> Result<(), RenderError>;
}
