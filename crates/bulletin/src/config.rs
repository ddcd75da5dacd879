//! Layered run configuration.

use bulletin_core::{Dimensions, Target};
use bulletin_error::{BulletinError, BulletinResult, ConfigError};
use bulletin_models::HeyGenSettings;
use bulletin_pipeline::{PipelineSettings, PipelineSettingsBuilder};
use bulletin_rate_limit::{LimitConfig, RetryConfig};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../bulletin.toml");

/// Environment variable holding the oracle API key.
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Environment variable holding the render service API key.
pub const HEYGEN_API_KEY: &str = "HEYGEN_API_KEY";

/// Oracle models and quotas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Model for research extraction
    pub research_model: String,
    /// Model for the script
    pub script_model: String,
    /// Model for the social media post
    pub post_model: String,
    /// Model for storyboard frames
    pub image_model: String,
    /// Thinking token budget; provider default when absent
    #[serde(default)]
    pub thinking_budget: Option<i32>,
    /// Request quotas
    #[serde(default)]
    pub limits: LimitConfig,
    /// Overload retry policy
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Rendering, polling and composition settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Avatar clip settings; also fix the output dimensions
    #[serde(default)]
    pub heygen: HeyGenSettings,
    /// Seconds between job polling rounds
    pub poll_interval_secs: u64,
    /// Polling rounds before giving up
    pub max_poll_rounds: usize,
    /// Background for the opening and closing takes
    pub backdrop: PathBuf,
    /// JSON map of phonetic spellings applied before filming
    #[serde(default)]
    pub pronunciation: Option<PathBuf>,
    /// ffmpeg executable
    pub ffmpeg: String,
    /// Headless browser executable for dynamic pages
    pub browser: String,
    /// Font for title overlays
    #[serde(default)]
    pub font_file: Option<PathBuf>,
    /// Render credits required by the setup check
    pub min_credits: f64,
}

/// Episode and working directory settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Parent of the dated working directories
    pub gen_dir: PathBuf,
    /// Show name used in job titles
    pub show_name: String,
    /// Title on the intro card
    pub intro_title: String,
    /// Episode label; the run date when absent
    #[serde(default)]
    pub episode: Option<String>,
    /// Default number of stories per script
    pub num_stories: usize,
    /// Days of earlier scripts shown to the script writer
    pub recent_days: u64,
    /// Concurrent enrichment fetches per target
    pub enrichment_workers: usize,
}

/// Complete Bulletin configuration.
///
/// Sources, later overriding earlier:
/// 1. Bundled defaults (`bulletin.toml` shipped with the binary)
/// 2. `~/.config/bulletin/bulletin.toml`
/// 3. `./bulletin.toml`
/// 4. A file named on the command line
///
/// Tables merge key by key, so an override file only lists what it changes.
/// Targets are keyed by name under `[targets.<name>]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletinConfig {
    /// Oracle settings
    pub oracle: OracleConfig,
    /// Render settings
    pub render: RenderConfig,
    /// Pipeline settings
    pub pipeline: PipelineConfig,
    /// Discovery targets by name
    #[serde(default)]
    pub targets: BTreeMap<String, Target>,
}

fn config_error(context: &str, e: impl std::fmt::Display) -> BulletinError {
    ConfigError::new(format!("{}: {}", context, e)).into()
}

impl BulletinConfig {
    /// The bundled defaults alone.
    pub fn bundled() -> BulletinResult<Self> {
        Self::build(Self::defaults())
    }

    /// Bundled defaults overridden by the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or does not parse.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> BulletinResult<Self> {
        debug!("Loading configuration from file");
        Self::build(Self::defaults().add_source(File::from(path.as_ref())))
    }

    /// Loads every configuration layer, ending with `explicit` when given.
    ///
    /// The home and current-directory files are optional; an explicit file
    /// must exist.
    #[instrument(skip(explicit))]
    pub fn load(explicit: Option<&Path>) -> BulletinResult<Self> {
        debug!("Loading configuration with precedence: explicit > current dir > home dir > bundled defaults");
        let mut builder = Self::defaults();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/bulletin/bulletin.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("bulletin").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path));
        }

        Self::build(builder)
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> BulletinResult<Self> {
        builder
            .build()
            .map_err(|e| config_error("Failed to build configuration", e))?
            .try_deserialize()
            .map_err(|e| config_error("Failed to parse configuration", e))
    }

    /// Configured targets, each carrying its table name.
    pub fn targets(&self) -> Vec<Target> {
        self.targets
            .iter()
            .map(|(name, target)| target.clone().with_name(name.as_str()))
            .collect()
    }

    /// Every model the run needs from the oracle.
    pub fn required_models(&self) -> Vec<String> {
        let oracle = &self.oracle;
        let mut models = vec![
            oracle.research_model.clone(),
            oracle.script_model.clone(),
            oracle.post_model.clone(),
            oracle.image_model.clone(),
        ];
        models.sort();
        models.dedup();
        models
    }

    /// Step settings for a run.
    pub fn pipeline_settings(&self) -> BulletinResult<PipelineSettings> {
        let heygen = &self.render.heygen;
        PipelineSettingsBuilder::default()
            .research_model(self.oracle.research_model.as_str())
            .script_model(self.oracle.script_model.as_str())
            .post_model(self.oracle.post_model.as_str())
            .show_name(self.pipeline.show_name.as_str())
            .intro_title(self.pipeline.intro_title.as_str())
            .episode(self.pipeline.episode.clone())
            .dimensions(Dimensions::new(*heygen.width(), *heygen.height()))
            .backdrop(self.render.backdrop.clone())
            .poll_interval(Duration::from_secs(self.render.poll_interval_secs))
            .max_poll_rounds(self.render.max_poll_rounds)
            .enrichment_workers(self.pipeline.enrichment_workers.max(1))
            .build()
            .map_err(|e| config_error("Invalid pipeline settings", e))
    }
}

/// Reads a required secret from the environment.
///
/// # Errors
///
/// Returns a configuration error naming the variable when it is unset or empty.
pub fn api_key(variable: &str) -> BulletinResult<String> {
    match std::env::var(variable) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::new(format!("Environment variable not set: {}", variable)).into()),
    }
}
