//! Image encoding, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** (PNG, JPEG, WebP) | `image::load_from_memory` |
//! | **Encode → JPEG** | `image::codecs::jpeg::JpegEncoder` |
//! | **Placeholder text** | `font8x8` bitmap glyphs drawn onto an `RgbImage` |
//!
//! The module is split into:
//! - **Parameters**: [`Quality`] and [`PlaceholderParams`]
//! - **Encode**: normalizing service payloads to JPEG
//! - **Placeholder**: fallback canvases with the failed prompt as caption

pub mod encode;
mod params;
pub mod placeholder;

use thiserror::Error;

pub use encode::{normalize_to_jpeg, save_jpeg};
pub use params::{PlaceholderParams, Quality};
pub use placeholder::{create_placeholder_image, wrap_caption};

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}
