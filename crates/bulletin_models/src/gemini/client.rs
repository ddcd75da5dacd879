//! Gemini client implementing structured extraction and frame generation.

use super::dto::{
    ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig,
    ListModelsResponse, ThinkingConfig,
};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bulletin_error::{OracleError, OracleErrorKind, OracleResult, RenderError, RenderErrorKind};
use bulletin_interface::{ExtractionOracle, FrameGenerator, OracleRequest, OracleResponse};
use reqwest::Client;
use std::path::Path;
use tracing::{debug, info, instrument};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini REST client.
///
/// Structured requests ask for `application/json` output with the request's
/// schema. Image requests ask for the `IMAGE` modality and decode the inline
/// image data.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    image_model: String,
    thinking_budget: Option<i32>,
}

impl GeminiClient {
    /// Creates a client with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` if `api_key` is empty.
    #[instrument(skip_all)]
    pub fn new(api_key: impl Into<String>, image_model: impl Into<String>) -> OracleResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(OracleError::new(OracleErrorKind::MissingApiKey));
        }

        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            image_model: image_model.into(),
            thinking_budget: Some(0),
        })
    }

    /// Overrides the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the thinking budget for text requests; `None` leaves the model default.
    pub fn with_thinking_budget(mut self, budget: Option<i32>) -> Self {
        self.thinking_budget = budget;
        self
    }

    fn model_path(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        }
    }

    async fn generate_content(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> OracleResult<GenerateContentResponse> {
        let url = format!(
            "{}/{}:generateContent",
            self.base_url,
            Self::model_path(model)
        );
        debug!(url = %url, "Sending Gemini request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| OracleError::new(OracleErrorKind::Request(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::new(api_error(status.as_u16(), &body)));
        }

        response.json().await.map_err(|e| {
            OracleError::new(OracleErrorKind::InvalidResponse(format!(
                "Failed to parse response: {}",
                e
            )))
        })
    }
}

/// Maps an error response onto an oracle error kind.
pub(crate) fn api_error(status_code: u16, body: &str) -> OracleErrorKind {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string());
    OracleErrorKind::from_status(status_code, message)
}

#[async_trait]
impl ExtractionOracle for GeminiClient {
    #[instrument(skip(self, request), fields(model = %request.model(), structured = request.schema().is_some()))]
    async fn generate(&self, request: &OracleRequest) -> OracleResult<OracleResponse> {
        let generation_config = GenerationConfig {
            response_mime_type: request
                .schema()
                .as_ref()
                .map(|_| "application/json".to_string()),
            response_schema: request.schema().clone(),
            thinking_config: self.thinking_budget.map(|thinking_budget| ThinkingConfig {
                thinking_budget,
            }),
            ..Default::default()
        };
        let body = GenerateContentRequest::from_prompt(request.prompt(), generation_config);

        let response = self.generate_content(request.model(), &body).await?;
        let usage = response.usage();
        let text = response
            .text()
            .ok_or_else(|| OracleError::new(OracleErrorKind::EmptyResponse))?;

        debug!(
            prompt_tokens = usage.prompt,
            candidate_tokens = usage.candidates,
            "Gemini response received"
        );
        Ok(OracleResponse { text, usage })
    }

    #[instrument(skip(self))]
    async fn available_models(&self) -> OracleResult<Vec<String>> {
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(format!("{}/models", self.base_url))
                .header("x-goog-api-key", &self.api_key)
                .query(&[("pageSize", "1000")]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| OracleError::new(OracleErrorKind::Request(e.to_string())))?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(OracleError::new(api_error(status.as_u16(), &body)));
            }

            let page: ListModelsResponse = response.json().await.map_err(|e| {
                OracleError::new(OracleErrorKind::InvalidResponse(e.to_string()))
            })?;
            names.extend(page.models.into_iter().map(|m| m.name));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(names)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

#[async_trait]
impl FrameGenerator for GeminiClient {
    #[instrument(skip(self, description), fields(model = %self.image_model, dest = %dest.display()))]
    async fn generate_frame(
        &self,
        description: &str,
        aspect_ratio: &str,
        dest: &Path,
    ) -> Result<(), RenderError> {
        let generation_config = GenerationConfig {
            response_modalities: Some(vec!["IMAGE".to_string()]),
            image_config: Some(ImageConfig {
                aspect_ratio: aspect_ratio.to_string(),
            }),
            ..Default::default()
        };
        let body = GenerateContentRequest::from_prompt(description, generation_config);

        let response = self
            .generate_content(&self.image_model, &body)
            .await
            .map_err(|e| RenderError::new(RenderErrorKind::Composition(e.to_string())))?;

        for part in response.parts() {
            if let Some(text) = &part.text {
                info!(text = %text, "Image model returned text");
            }
        }

        let image = response
            .parts()
            .iter()
            .find_map(|part| part.inline_data.as_ref())
            .ok_or_else(|| {
                RenderError::new(RenderErrorKind::Composition(
                    "Image model returned no image".to_string(),
                ))
            })?;

        let bytes = STANDARD.decode(&image.data).map_err(|e| {
            RenderError::new(RenderErrorKind::Composition(format!(
                "Base64 decode error: {}",
                e
            )))
        })?;

        tokio::fs::write(dest, &bytes).await.map_err(|e| {
            RenderError::new(RenderErrorKind::Composition(format!(
                "{}: {}",
                dest.display(),
                e
            )))
        })?;

        info!(size = bytes.len(), mime_type = %image.mime_type, "Wrote generated frame");
        Ok(())
    }
}
