//! Frame generator and compositor that write placeholder files.

use async_trait::async_trait;
use bulletin_core::CompositionPlan;
use bulletin_error::RenderError;
use bulletin_interface::{Compositor, FrameGenerator};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Writes a placeholder image and records each request.
#[derive(Default)]
pub struct MockFrames {
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockFrames {
    /// (description, aspect ratio) of each request.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl FrameGenerator for MockFrames {
    async fn generate_frame(
        &self,
        description: &str,
        aspect_ratio: &str,
        dest: &Path,
    ) -> Result<(), RenderError> {
        self.requests
            .lock()
            .unwrap()
            .push((description.to_string(), aspect_ratio.to_string()));
        tokio::fs::write(dest, b"jpg").await.unwrap();
        Ok(())
    }
}

/// Writes a placeholder video and records each plan.
#[derive(Default)]
pub struct MockCompositor {
    plans: Arc<Mutex<Vec<CompositionPlan>>>,
}

impl MockCompositor {
    /// Plans composed so far.
    pub fn plans(&self) -> Vec<CompositionPlan> {
        self.plans.lock().unwrap().clone()
    }
}

#[async_trait]
impl Compositor for MockCompositor {
    async fn compose(&self, plan: &CompositionPlan) -> Result<(), RenderError> {
        self.plans.lock().unwrap().push(plan.clone());
        tokio::fs::write(&plan.output, b"video").await.unwrap();
        Ok(())
    }
}
