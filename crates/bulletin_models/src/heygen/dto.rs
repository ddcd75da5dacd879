//! HeyGen REST request and response bodies.

use serde::{Deserialize, Serialize};

/// Every HeyGen response wraps its payload in `data`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct QuotaData {
    pub remaining_quota: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AssetData {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VideoData {
    pub video_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StatusData {
    pub status: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct GenerateRequest {
    pub title: String,
    pub dimension: Dimension,
    pub video_inputs: Vec<VideoInput>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Dimension {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct VideoInput {
    pub character: Character,
    pub voice: Voice,
    pub background: Background,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Character {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub avatar_id: String,
    pub avatar_style: &'static str,
    pub talking_style: String,
    pub offset: Offset,
    pub scale: f64,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Offset {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Voice {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub voice_id: String,
    pub input_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Background {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub image_asset_id: String,
}
