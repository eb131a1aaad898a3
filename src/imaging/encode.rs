//! JPEG output for generated and placeholder images.
//!
//! The image service may return PNG, WebP or JPEG depending on the model.
//! Bundles always carry `.jpg` files, so every payload is decoded, flattened
//! to RGB (JPEG has no alpha) and re-encoded.

use super::ImagingError;
use super::params::Quality;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Decode `bytes` in whatever format they arrive and write them as JPEG.
pub fn normalize_to_jpeg(bytes: &[u8], output: &Path, quality: Quality) -> Result<(), ImagingError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| ImagingError::ProcessingFailed(format!("Failed to decode image: {}", e)))?;
    save_jpeg(&img, output, quality)
}

/// Encode `img` as an RGB JPEG at `output`.
pub fn save_jpeg(img: &DynamicImage, output: &Path, quality: Quality) -> Result<(), ImagingError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let writer = BufWriter::new(File::create(output)?);
    let encoder = JpegEncoder::new_with_quality(writer, quality.as_u8());
    rgb.write_with_encoder(encoder)
        .map_err(|e| ImagingError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}
