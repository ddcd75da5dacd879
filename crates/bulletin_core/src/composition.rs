//! Composition plans handed to the compositor.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Graphics drawn over one clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TitleOverlay {
    /// Full-screen title card for the intro and outro
    Card {
        /// Main line
        title: String,
        /// Second line
        subtitle: String,
    },
    /// Lower-third event details
    EventInfo {
        /// Event name
        name: String,
        /// Date and time
        when: String,
        /// Location
        #[serde(rename = "where")]
        where_: String,
    },
}

/// One clip of the final video with its overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Source clip
    pub clip: PathBuf,
    /// Overlay for the clip
    pub overlay: TitleOverlay,
}

/// Everything needed to render the final video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionPlan {
    /// Segments in playback order
    pub segments: Vec<Segment>,
    /// Destination file
    pub output: PathBuf,
}

/// Replaces typographic quotes that title fonts lack.
///
/// # Examples
///
/// ```
/// use bulletin_core::title_safe;
///
/// assert_eq!(title_safe("Kids\u{2019} \u{201c}Fun\u{201d} Day"), "Kids' \"Fun\" Day");
/// ```
pub fn title_safe(text: &str) -> String {
    text.replace('\u{2019}', "'")
        .replace('\u{201c}', "\"")
        .replace('\u{201d}', "\"")
}
