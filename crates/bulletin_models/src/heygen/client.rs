//! HeyGen client implementing the generation job interface.

use super::dto::{
    AssetData, Background, Character, Dimension, Envelope, GenerateRequest, Offset, QuotaData,
    StatusData, VideoData, VideoInput, Voice,
};
use async_trait::async_trait;
use bulletin_core::{JobStatus, JobStatusReport, Quota};
use bulletin_error::{RenderError, RenderErrorKind};
use bulletin_interface::GenerationJobClient;
use futures::StreamExt;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

const API_BASE: &str = "https://api.heygen.com";
const UPLOAD_BASE: &str = "https://upload.heygen.com";

/// Avatar, voice and framing used for every generated clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct HeyGenSettings {
    /// Avatar to present the clip
    #[serde(default = "default_avatar_id")]
    avatar_id: String,
    /// Voice reading the text
    #[serde(default = "default_voice_id")]
    voice_id: String,
    /// Output width in pixels
    #[serde(default = "default_width")]
    width: u32,
    /// Output height in pixels
    #[serde(default = "default_height")]
    height: u32,
    /// Horizontal avatar offset
    #[serde(default)]
    offset_x: f64,
    /// Vertical avatar offset
    #[serde(default = "default_offset_y")]
    offset_y: f64,
    /// Avatar scale
    #[serde(default = "default_scale")]
    scale: f64,
    /// Avatar talking style
    #[serde(default = "default_talking_style")]
    talking_style: String,
}

fn default_avatar_id() -> String {
    "Georgia_expressive_2024112701".to_string()
}

fn default_voice_id() -> String {
    "511ffd086a904ef593b608032004112c".to_string()
}

fn default_width() -> u32 {
    720
}

fn default_height() -> u32 {
    1280
}

fn default_offset_y() -> f64 {
    0.09
}

fn default_scale() -> f64 {
    1.71
}

fn default_talking_style() -> String {
    "expressive".to_string()
}

impl Default for HeyGenSettings {
    fn default() -> Self {
        Self {
            avatar_id: default_avatar_id(),
            voice_id: default_voice_id(),
            width: default_width(),
            height: default_height(),
            offset_x: 0.0,
            offset_y: default_offset_y(),
            scale: default_scale(),
            talking_style: default_talking_style(),
        }
    }
}

/// HeyGen REST client.
#[derive(Debug, Clone)]
pub struct HeyGenClient {
    client: Client,
    api_key: String,
    settings: HeyGenSettings,
    api_base: String,
    upload_base: String,
}

impl HeyGenClient {
    /// Creates a client with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` if `api_key` is empty.
    pub fn new(api_key: impl Into<String>, settings: HeyGenSettings) -> Result<Self, RenderError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RenderError::new(RenderErrorKind::MissingApiKey));
        }
        Ok(Self {
            client: Client::new(),
            api_key,
            settings,
            api_base: API_BASE.to_string(),
            upload_base: UPLOAD_BASE.to_string(),
        })
    }

    /// Overrides both API hosts.
    pub fn with_base_urls(mut self, api_base: impl Into<String>, upload_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self.upload_base = upload_base.into();
        self
    }

    pub(crate) fn generate_body(&self, title: &str, text: &str, asset_id: &str) -> GenerateRequest {
        let s = &self.settings;
        GenerateRequest {
            title: title.to_string(),
            dimension: Dimension {
                width: s.width,
                height: s.height,
            },
            video_inputs: vec![VideoInput {
                character: Character {
                    kind: "avatar",
                    avatar_id: s.avatar_id.clone(),
                    avatar_style: "normal",
                    talking_style: s.talking_style.clone(),
                    offset: Offset {
                        x: s.offset_x,
                        y: s.offset_y,
                    },
                    scale: s.scale,
                },
                voice: Voice {
                    kind: "text",
                    voice_id: s.voice_id.clone(),
                    input_text: text.to_string(),
                },
                background: Background {
                    kind: "image",
                    image_asset_id: asset_id.to_string(),
                },
            }],
        }
    }
}

/// Reads `data` from a response, mapping HTTP failures onto `Api`.
async fn read_data<T: DeserializeOwned>(response: Response) -> Result<T, RenderError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| RenderError::new(RenderErrorKind::Api {
            status_code: status.as_u16(),
            message: e.to_string(),
        }))?;

    if !status.is_success() {
        return Err(RenderError::new(RenderErrorKind::Api {
            status_code: status.as_u16(),
            message: body,
        }));
    }

    let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
        RenderError::new(RenderErrorKind::Api {
            status_code: status.as_u16(),
            message: format!("Unexpected body ({}): {}", e, body),
        })
    })?;

    envelope.data.ok_or_else(|| {
        RenderError::new(RenderErrorKind::Api {
            status_code: status.as_u16(),
            message: envelope
                .error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Response has no data".to_string()),
        })
    })
}

/// Interprets a status payload.
pub(crate) fn parse_status(data: StatusData) -> Result<JobStatusReport, RenderError> {
    let status = JobStatus::from_str(&data.status)
        .map_err(|_| RenderError::new(RenderErrorKind::StatusUnparsable(data.status.clone())))?;
    let error = data.error.filter(|e| !e.is_null()).map(|e| match e {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    });
    Ok(JobStatusReport {
        status,
        video_url: data.video_url.filter(|u| !u.is_empty()),
        error,
    })
}

fn image_content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}

#[async_trait]
impl GenerationJobClient for HeyGenClient {
    #[instrument(skip(self))]
    async fn check_quota(&self) -> Result<Quota, RenderError> {
        let response = self
            .client
            .get(format!("{}/v2/user/remaining_quota", self.api_base))
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| RenderError::new(RenderErrorKind::Request(e.to_string())))?;
        let data: QuotaData = read_data(response).await?;
        Ok(Quota {
            remaining_quota: data.remaining_quota,
        })
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    async fn upload_asset(&self, path: &Path) -> Result<String, RenderError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            RenderError::new(RenderErrorKind::Upload(format!("{}: {}", path.display(), e)))
        })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("frame");

        let response = self
            .client
            .post(format!("{}/v1/asset", self.upload_base))
            .query(&[("name", name)])
            .header("x-api-key", &self.api_key)
            .header("Content-Type", image_content_type(path))
            .body(bytes)
            .send()
            .await
            .map_err(|e| RenderError::new(RenderErrorKind::Upload(e.to_string())))?;

        let data: AssetData = read_data(response).await?;
        debug!(asset_id = %data.id, "Uploaded asset");
        Ok(data.id)
    }

    #[instrument(skip(self, text))]
    async fn submit_job(
        &self,
        title: &str,
        text: &str,
        asset_id: &str,
    ) -> Result<String, RenderError> {
        let body = self.generate_body(title, text, asset_id);
        let response = self
            .client
            .post(format!("{}/v2/video/generate", self.api_base))
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RenderError::new(RenderErrorKind::Request(e.to_string())))?;

        let data: VideoData = read_data(response).await?;
        info!(video_id = %data.video_id, "Submitted video job");
        Ok(data.video_id)
    }

    #[instrument(skip(self))]
    async fn job_status(&self, job_id: &str) -> Result<JobStatusReport, RenderError> {
        let response = self
            .client
            .get(format!("{}/v1/video_status.get", self.api_base))
            .query(&[("video_id", job_id)])
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| RenderError::new(RenderErrorKind::Request(e.to_string())))?;

        let data: StatusData = read_data(response)
            .await
            .map_err(|e| RenderError::new(RenderErrorKind::StatusUnparsable(e.to_string())))?;
        parse_status(data)
    }

    #[instrument(skip(self, url), fields(dest = %dest.display()))]
    async fn download(&self, url: &str, dest: &Path) -> Result<(), RenderError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| RenderError::new(RenderErrorKind::Download(e.to_string())))?;

        let mut file = tokio::fs::File::create(dest).await.map_err(|e| {
            RenderError::new(RenderErrorKind::Download(format!("{}: {}", dest.display(), e)))
        })?;

        let mut stream = response.bytes_stream();
        let mut written = 0usize;
        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| RenderError::new(RenderErrorKind::Download(e.to_string())))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| RenderError::new(RenderErrorKind::Download(e.to_string())))?;
            written += chunk.len();
        }
        file.flush()
            .await
            .map_err(|e| RenderError::new(RenderErrorKind::Download(e.to_string())))?;

        debug!(bytes = written, "Downloaded clip");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_asset(&self, asset_id: &str) -> Result<(), RenderError> {
        let response = self
            .client
            .post(format!("{}/v1/asset/{}/delete", self.api_base, asset_id))
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| RenderError::new(RenderErrorKind::Request(e.to_string())))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            warn!(status, message = %message, "Asset delete rejected");
            return Err(RenderError::new(RenderErrorKind::Api {
                status_code: status,
                message,
            }));
        }
        Ok(())
    }

    fn processor_name(&self) -> &'static str {
        "HeyGen Avatar V2"
    }
}
