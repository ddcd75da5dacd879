//! Extracted event records.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One discovered event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedRecord {
    /// Organization hosting the event
    #[serde(default)]
    pub organization: String,
    /// Event title
    pub title: String,
    /// Link to the event's own page
    #[serde(default)]
    pub link: Option<String>,
    /// Free-text description
    pub description: String,
    /// When the event happens, as written by the source
    pub when: String,
    /// Where the event happens
    pub location: String,
    /// Admission price, if any
    #[serde(default)]
    pub price: Option<String>,
    /// Audience age tags
    #[serde(default)]
    pub target_age: Vec<String>,
}

/// Records plus candidate follow-links extracted from one page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct EventsResult {
    /// Events found on the page
    pub events: Vec<ExtractedRecord>,
    /// Other links on the page that may lead to more events
    #[serde(default)]
    pub other_urls: Vec<String>,
}
