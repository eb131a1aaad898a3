//! Parameter types for image operations.
//!
//! - [`Quality`] — JPEG encoding quality (1–100, default 85). Clamped on construction.
//! - [`PlaceholderParams`] — Canvas size and quality for a fallback image.

use crate::config::ImagesConfig;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// The value as the JPEG encoder expects it.
    pub fn as_u8(self) -> u8 {
        self.0.clamp(1, 100) as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Everything needed to render one placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderParams {
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}

impl PlaceholderParams {
    pub fn from_config(images: &ImagesConfig) -> Self {
        Self {
            width: images.placeholder_width,
            height: images.placeholder_height,
            quality: Quality::new(images.quality),
        }
    }
}

impl Default for PlaceholderParams {
    fn default() -> Self {
        Self::from_config(&ImagesConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_85() {
        assert_eq!(Quality::default().value(), 85);
        assert_eq!(Quality(300).as_u8(), 100);
    }

    #[test]
    fn placeholder_params_follow_config() {
        let params = PlaceholderParams::default();
        assert_eq!((params.width, params.height), (1200, 630));
        assert_eq!(params.quality, Quality(85));
    }
}
