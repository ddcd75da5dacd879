//! Episode scripts.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One story segment of a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Story {
    /// Narration for the segment
    pub text: String,
    /// Description of the background image
    pub image_desc: String,
    /// Description of the background music
    pub music_desc: String,
    /// On-screen title
    pub title: String,
    /// On-screen date and time
    pub when: String,
    /// On-screen location
    #[serde(rename = "where")]
    pub where_: String,
    /// Link for the post text
    #[serde(default)]
    pub link: Option<String>,
    /// Hosting organization
    pub organization: String,
}

/// A complete episode script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Script {
    /// Narration before the first story
    pub opening: String,
    /// Story segments in broadcast order
    pub stories: Vec<Story>,
    /// Narration after the last story
    pub closing: String,
}
