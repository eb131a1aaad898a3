//! Model traits and the shared error type.
//!
//! [`GenAiError::QuotaExhausted`] is the only error class callers retry;
//! everything else is final for the call that produced it.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenAiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Quota exhausted: {0}")]
    QuotaExhausted(String),
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("No image returned: {0}")]
    NoImage(String),
    #[error("Image payload decode failed: {0}")]
    Decode(#[from] base64::DecodeError),
}

impl GenAiError {
    /// The service throttled the caller; the same request may succeed later.
    pub fn is_quota_exhausted(&self) -> bool {
        matches!(self, GenAiError::QuotaExhausted(_))
    }
}

/// A text generation model reachable by name.
pub trait TextModel {
    /// Send one prompt to `model` and return the reply text.
    fn generate_text(&self, model: &str, prompt: &str) -> Result<String, GenAiError>;
}

/// An image generation model reachable by name.
pub trait ImageModel {
    /// Generate one image for `prompt` and return the encoded bytes as
    /// delivered by the service (format not guaranteed).
    fn generate_image(&self, model: &str, prompt: &str) -> Result<Vec<u8>, GenAiError>;
}
