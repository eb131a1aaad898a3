//! REST client for Gemini text models and Imagen image models.
//!
//! ## Requests
//!
//! | Operation | Endpoint | Reply field |
//! |---|---|---|
//! | Text | `POST {api_base}/models/{model}:generateContent` | `candidates[0].content.parts[*].text` |
//! | Image | `POST {api_base}/models/{model}:predict` | `predictions[0].bytesBase64Encoded` |
//!
//! Every request carries the API key in `x-goog-api-key`, and the configured
//! project (if any) in `x-goog-user-project` so quota is charged there.
//!
//! ## Error Classification
//!
//! HTTP 429, or any error body mentioning `RESOURCE_EXHAUSTED`, becomes
//! [`GenAiError::QuotaExhausted`]. Other non-2xx statuses become
//! [`GenAiError::Api`].

use super::backend::{GenAiError, ImageModel, TextModel};
use crate::config::ServiceConfig;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::blocking::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

pub struct GeminiClient {
    http: Client,
    api_key: String,
    api_base: String,
    project_id: Option<String>,
}

impl GeminiClient {
    /// Build a client for the configured service.
    pub fn new(api_key: &str, service: &ServiceConfig) -> Result<Self, GenAiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(service.request_timeout_seconds))
            .build()?;
        let project_id = Some(service.project_id.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        Ok(Self {
            http,
            api_key: api_key.trim().to_string(),
            api_base: service.api_base.trim_end_matches('/').to_string(),
            project_id,
        })
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.api_base, model, method)
    }

    fn post(&self, url: &str, body: &Value) -> Result<Value, GenAiError> {
        let mut request = self
            .http
            .post(url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(body);
        if let Some(project) = &self.project_id {
            request = request.header("x-goog-user-project", project);
        }

        let resp = request.send()?;
        let status = resp.status();
        debug!(url, status = status.as_u16(), "generation service replied");
        if !status.is_success() {
            let text = resp.text().unwrap_or_else(|e| {
                debug!(url, error = %e, "could not read error body");
                String::new()
            });
            return Err(classify_failure(status.as_u16(), text));
        }
        Ok(resp.json()?)
    }
}

impl TextModel for GeminiClient {
    fn generate_text(&self, model: &str, prompt: &str) -> Result<String, GenAiError> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });
        let reply = self.post(&self.endpoint(model, "generateContent"), &body)?;
        extract_text(&reply)
    }
}

impl ImageModel for GeminiClient {
    fn generate_image(&self, model: &str, prompt: &str) -> Result<Vec<u8>, GenAiError> {
        let body = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": { "sampleCount": 1 }
        });
        let reply = self.post(&self.endpoint(model, "predict"), &body)?;
        extract_image(&reply)
    }
}

/// Map a non-success HTTP reply to an error, separating quota throttling.
pub fn classify_failure(status: u16, body: String) -> GenAiError {
    if status == 429 || body.contains("RESOURCE_EXHAUSTED") {
        GenAiError::QuotaExhausted(body)
    } else {
        GenAiError::Api {
            status,
            message: body,
        }
    }
}

/// Concatenate the text parts of the first candidate.
pub fn extract_text(reply: &Value) -> Result<String, GenAiError> {
    let Some(candidate) = reply["candidates"].as_array().and_then(|c| c.first()) else {
        let reason = reply["promptFeedback"]["blockReason"]
            .as_str()
            .unwrap_or("no candidates");
        return Err(GenAiError::InvalidResponse(format!(
            "text reply has no candidates ({reason})"
        )));
    };

    let parts = candidate["content"]["parts"]
        .as_array()
        .ok_or_else(|| GenAiError::InvalidResponse("candidate has no content parts".to_string()))?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.is_empty() {
        return Err(GenAiError::InvalidResponse(
            "candidate content is empty".to_string(),
        ));
    }
    Ok(text)
}

/// Decode the first generated image.
///
/// An empty prediction list means the prompt was filtered; that is not retried.
pub fn extract_image(reply: &Value) -> Result<Vec<u8>, GenAiError> {
    let predictions = reply["predictions"].as_array().map(Vec::as_slice).unwrap_or(&[]);
    let encoded = predictions
        .iter()
        .find_map(|p| p["bytesBase64Encoded"].as_str());
    match encoded {
        Some(data) => Ok(STANDARD.decode(data)?),
        None => {
            let reason = predictions
                .iter()
                .find_map(|p| p["raiFilteredReason"].as_str())
                .unwrap_or("empty prediction list");
            Err(GenAiError::NoImage(reason.to_string()))
        }
    }
}
