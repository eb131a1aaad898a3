//! Image production: one JPEG per image spec, in plan order.
//!
//! ## Per-Image Flow
//!
//! ```text
//! spec → filename (featured_image.jpg | image_N.jpg)
//!      → generate (retry on quota exhaustion only)
//!      → decode + re-encode as JPEG
//!      ↘ on any failure: placeholder with the prompt as caption
//! ```
//!
//! ## Retry Policy
//!
//! At most `api.max_retries` calls per spec. A quota error on attempt `n`
//! (0-based) waits `initial_backoff * 2^n` before the next call, unless it was
//! the last permitted call. Any other error ends the loop at once. With the
//! defaults (3 retries, 2s) a permanently throttled spec sleeps 2s then 4s and
//! falls back after the third call.
//!
//! The call delay separates consecutive images; none is added after the last.
//!
//! Every spec ends up in the returned map. Only a failure to write the
//! placeholder itself is an error.

use crate::config::{ApiConfig, GeneratorConfig};
use crate::genai::{GenAiError, ImageModel};
use crate::imaging::{self, ImagingError, PlaceholderParams, Quality};
use crate::naming;
use crate::pacing::Pacer;
use crate::types::{ImageFileMap, Plan};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Placeholder for {marker} could not be written to {path}: {source}")]
    Placeholder {
        marker: String,
        path: PathBuf,
        #[source]
        source: ImagingError,
    },
}

/// Call the image model, backing off while the service reports quota exhaustion.
pub fn generate_with_retry(
    model: &dyn ImageModel,
    model_name: &str,
    prompt: &str,
    api: &ApiConfig,
    pacer: &dyn Pacer,
) -> Result<Vec<u8>, GenAiError> {
    let max_attempts = api.max_retries.max(1);
    let mut attempt = 0;
    loop {
        match model.generate_image(model_name, prompt) {
            Ok(bytes) => return Ok(bytes),
            Err(err) if err.is_quota_exhausted() && attempt + 1 < max_attempts => {
                let wait = api.backoff_for(attempt);
                warn!(
                    attempt = attempt + 1,
                    max_attempts,
                    wait_secs = wait.as_secs(),
                    "image quota exhausted, backing off"
                );
                pacer.pause(wait);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Produce an image file for every spec in `plan` under `paths.temp_image_dir`.
pub fn produce_images(
    model: &dyn ImageModel,
    config: &GeneratorConfig,
    plan: &Plan,
    pacer: &dyn Pacer,
) -> Result<ImageFileMap, ImageError> {
    let temp_dir = &config.paths.temp_image_dir;
    fs::create_dir_all(temp_dir)?;

    let quality = Quality::new(config.images.quality);
    let placeholder_params = PlaceholderParams::from_config(&config.images);
    let filenames = naming::assign_filenames(&plan.image_plan);
    let total = plan.image_plan.len();
    let mut images = ImageFileMap::new();

    for (index, (spec, (marker, filename))) in plan.image_plan.iter().zip(filenames).enumerate() {
        let path = temp_dir.join(&filename);
        info!(marker = %marker, file = %filename, "generating image {}/{}", index + 1, total);

        let outcome = match generate_with_retry(
            model,
            &config.models.image_model_name,
            &spec.generation_prompt,
            &config.api,
            pacer,
        ) {
            Ok(bytes) => imaging::normalize_to_jpeg(&bytes, &path, quality).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        let placeholder = match outcome {
            Ok(()) => false,
            Err(reason) => {
                warn!(marker = %marker, %reason, "image generation failed, writing placeholder");
                imaging::create_placeholder_image(&spec.generation_prompt, &path, &placeholder_params)
                    .map_err(|source| ImageError::Placeholder {
                        marker: marker.clone(),
                        path: path.clone(),
                        source,
                    })?;
                true
            }
        };
        images.insert(marker, path, placeholder);

        if index + 1 < total {
            pacer.pause(config.api.call_delay());
        }
    }

    Ok(images)
}
