//! Storyboards, takes and output dimensions.

use bulletin_error::{PipelineError, PipelineErrorKind};
use serde::{Deserialize, Serialize};

/// One take: a segment of the final video paired with one generation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Take {
    /// Take number; 0 is the opening
    pub id: u32,
    /// Spoken text
    pub text: String,
    /// Background image path
    pub frame: String,
    /// On-screen title
    #[serde(default)]
    pub title: Option<String>,
    /// On-screen date and time
    #[serde(default)]
    pub when: Option<String>,
    /// On-screen location
    #[serde(default, rename = "where")]
    pub where_: Option<String>,
}

impl Take {
    /// A take with no on-screen graphics.
    pub fn plain(id: u32, text: impl Into<String>, frame: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            frame: frame.into(),
            title: None,
            when: None,
            where_: None,
        }
    }
}

/// The ordered takes of one episode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Storyboard {
    /// Takes in broadcast order
    pub takes: Vec<Take>,
}

impl Storyboard {
    /// Take ids in broadcast order.
    pub fn take_ids(&self) -> Vec<u32> {
        self.takes.iter().map(|take| take.id).collect()
    }
}

/// Output video dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

const ASPECT_TOLERANCE_PERCENT: f64 = 2.0;

fn percent_error(actual: f64, expected: f64) -> f64 {
    (actual - expected) / expected * 100.0
}

impl Dimensions {
    /// Creates dimensions from width and height.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The generation aspect ratio, "16:9" or "9:16", within 2 percent.
    ///
    /// # Examples
    ///
    /// ```
    /// use bulletin_core::Dimensions;
    ///
    /// assert_eq!(Dimensions::new(720, 1280).aspect_ratio().unwrap(), "9:16");
    /// assert_eq!(Dimensions::new(1920, 1080).aspect_ratio().unwrap(), "16:9");
    /// assert!(Dimensions::new(1000, 1000).aspect_ratio().is_err());
    /// ```
    #[track_caller]
    pub fn aspect_ratio(&self) -> Result<&'static str, PipelineError> {
        let invalid = || {
            PipelineError::new(PipelineErrorKind::DimensionsInvalid {
                width: self.width,
                height: self.height,
            })
        };
        if self.height == 0 {
            return Err(invalid());
        }

        let ratio = f64::from(self.width) / f64::from(self.height);
        if percent_error(ratio, 16.0 / 9.0).abs() < ASPECT_TOLERANCE_PERCENT {
            Ok("16:9")
        } else if percent_error(ratio, 9.0 / 16.0).abs() < ASPECT_TOLERANCE_PERCENT {
            Ok("9:16")
        } else {
            Err(invalid())
        }
    }
}
