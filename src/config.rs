//! Generator configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file is
//! required: stock defaults are the base layer and the user file is merged on
//! top of them, so the file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! [business]
//! context = "..."           # Business description fed to idea generation
//! contact_url = "https://example.com/#contact"  # Optional call-to-action link
//!
//! [models]
//! config_generation_model = "gemini-2.0-flash"
//! text_model_name = "gemini-2.0-flash"
//! image_model_name = "imagen-3.0-generate-002"
//!
//! [service]
//! project_id = ""           # Billing/quota project, sent with every request
//! location = "us-central1"
//! api_base = "https://generativelanguage.googleapis.com/v1beta"
//! request_timeout_seconds = 300
//!
//! [api]
//! max_retries = 3           # Image attempts per spec (quota errors only)
//! initial_backoff_seconds = 2
//! call_delay_seconds = 5    # Between API-calling stages and between images
//! interval_between_posts_seconds = 30
//! max_article_attempts = 2  # Regenerations when markers go missing
//!
//! [paths]
//! temp_image_dir = "temp_images"
//! default_csv_path = "titles.csv"
//! hugo_posts_path = "content/posts"
//!
//! [images]
//! quality = 85              # JPEG quality for normalized and placeholder images
//! placeholder_width = 1200
//! placeholder_height = 630
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "HUGO_POSTGEN_CONFIG";

/// Config file to load: the override when set and non-blank, else [`DEFAULT_CONFIG_FILE`].
pub fn config_path(env_override: Option<&str>) -> PathBuf {
    env_override
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Generator configuration loaded from `config.toml`.
///
/// Built once at startup and passed by reference into every component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Business context used to angle every article.
    pub business: BusinessConfig,
    /// Model identifiers per pipeline stage.
    pub models: ModelsConfig,
    /// Generation service endpoint settings.
    pub service: ServiceConfig,
    /// Retry, backoff, and pacing tunables.
    pub api: ApiConfig,
    /// Filesystem locations.
    pub paths: PathsConfig,
    /// Output image encoding and placeholder canvas.
    pub images: ImagesConfig,
}

impl GeneratorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.max_retries == 0 {
            return Err(ConfigError::Validation(
                "api.max_retries must be at least 1".into(),
            ));
        }
        if self.api.max_article_attempts == 0 {
            return Err(ConfigError::Validation(
                "api.max_article_attempts must be at least 1".into(),
            ));
        }
        if self.images.quality == 0 || self.images.quality > 100 {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.images.placeholder_width == 0 || self.images.placeholder_height == 0 {
            return Err(ConfigError::Validation(
                "images.placeholder_width and placeholder_height must be non-zero".into(),
            ));
        }
        for (key, value) in [
            ("models.config_generation_model", &self.models.config_generation_model),
            ("models.text_model_name", &self.models.text_model_name),
            ("models.image_model_name", &self.models.image_model_name),
            ("service.api_base", &self.service.api_base),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }
}

/// Business context settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BusinessConfig {
    /// Free-form description of the business the blog promotes.
    pub context: String,
    /// Link the article conclusion must end with. Omitted from prompts when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_url: Option<String>,
}

/// Model identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelsConfig {
    /// Model that turns a title into an article idea.
    pub config_generation_model: String,
    /// Model for the plan and the article prose.
    pub text_model_name: String,
    /// Image generation model.
    pub image_model_name: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            config_generation_model: "gemini-2.0-flash".to_string(),
            text_model_name: "gemini-2.0-flash".to_string(),
            image_model_name: "imagen-3.0-generate-002".to_string(),
        }
    }
}

/// Generation service endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Cloud project charged for quota. Empty means the key's own project.
    pub project_id: String,
    /// Cloud region, reported at startup.
    pub location: String,
    /// REST base URL, without a trailing slash.
    pub api_base: String,
    /// Per-request network timeout.
    pub request_timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            location: "us-central1".to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            request_timeout_seconds: 300,
        }
    }
}

/// Retry and pacing tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Maximum image generation attempts per image.
    pub max_retries: u32,
    /// First backoff after a quota error; doubles on every further attempt.
    pub initial_backoff_seconds: u64,
    /// Pause between API-calling stages and between image requests.
    pub call_delay_seconds: u64,
    /// Pause between two titles.
    pub interval_between_posts_seconds: u64,
    /// Total article generations allowed when placement markers go missing.
    pub max_article_attempts: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_seconds: 2,
            call_delay_seconds: 5,
            interval_between_posts_seconds: 30,
            max_article_attempts: 2,
        }
    }
}

impl ApiConfig {
    pub fn call_delay(&self) -> Duration {
        Duration::from_secs(self.call_delay_seconds)
    }

    pub fn interval_between_posts(&self) -> Duration {
        Duration::from_secs(self.interval_between_posts_seconds)
    }

    /// Backoff before the attempt following `attempt` (0-based):
    /// `initial_backoff * 2^attempt`.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        Duration::from_secs(self.initial_backoff_seconds.saturating_mul(factor))
    }
}

/// Filesystem locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Scratch directory the image producer writes into.
    pub temp_image_dir: PathBuf,
    /// Title list used when no CSV path is given on the command line.
    pub default_csv_path: PathBuf,
    /// Bundle output root used when none is given on the command line.
    pub hugo_posts_path: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            temp_image_dir: PathBuf::from("temp_images"),
            default_csv_path: PathBuf::from("titles.csv"),
            hugo_posts_path: PathBuf::from("content/posts"),
        }
    }
}

/// Output image settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// JPEG quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Placeholder canvas width in pixels.
    pub placeholder_width: u32,
    /// Placeholder canvas height in pixels.
    pub placeholder_height: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            quality: 85,
            placeholder_width: 1200,
            placeholder_height: 630,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GeneratorConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge a user value onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: toml::Value) -> Result<GeneratorConfig, ConfigError> {
    let merged = merge_toml(stock_defaults_value(), overlay);
    let config: GeneratorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config file at `path`.
///
/// A missing file is an error: the generator has no usable business context
/// or credentials project without one.
pub fn load_config(path: &Path) -> Result<GeneratorConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(value)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Printed as a starting point when the config file is missing.
pub fn stock_config_toml() -> &'static str {
    r##"# hugo-postgen configuration
# ==========================
# Values shown are the defaults. Only [business].context usually needs editing.
# Unknown keys cause an error.

[business]
# Describes the business the blog promotes. Every article is angled toward it.
context = ""
# Link the article conclusion ends with. Remove to leave the call to action out.
# contact_url = "https://example.com/#contact"

[models]
config_generation_model = "gemini-2.0-flash"
text_model_name = "gemini-2.0-flash"
image_model_name = "imagen-3.0-generate-002"

[service]
# Project charged for quota (sent as x-goog-user-project). Empty = key's project.
project_id = ""
location = "us-central1"
api_base = "https://generativelanguage.googleapis.com/v1beta"
request_timeout_seconds = 300

[api]
# Image attempts per image. Only quota errors are retried.
max_retries = 3
# Backoff doubles on each retry: 2s, 4s, 8s, ...
initial_backoff_seconds = 2
# Pause between API-calling stages and between image requests.
call_delay_seconds = 5
# Pause between two titles.
interval_between_posts_seconds = 30
# Article generations allowed when image markers go missing.
max_article_attempts = 2

[paths]
temp_image_dir = "temp_images"
default_csv_path = "titles.csv"
hugo_posts_path = "content/posts"

[images]
# JPEG quality for generated and placeholder images (1-100).
quality = 85
placeholder_width = 1200
placeholder_height = 630
"##
}
