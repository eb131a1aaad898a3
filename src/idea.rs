//! Blog idea generation: title → [`ArticleIdea`].
//!
//! One model call, no retry. A failed call or a reply that is not a JSON
//! object is reported as [`ConfigGenerationError`] and ends the title.

use crate::config::GeneratorConfig;
use crate::genai::{GenAiError, TextModel, parse_json_reply};
use crate::prompts;
use crate::types::ArticleIdea;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigGenerationError {
    #[error("Title is empty")]
    EmptyTitle,
    #[error("Model call failed: {0}")]
    Model(#[from] GenAiError),
    #[error("Reply is not a valid idea object: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Generate the article configuration for `title`.
///
/// A reply that omits `title` inherits the requested one.
pub fn generate_idea(
    model: &dyn TextModel,
    config: &GeneratorConfig,
    title: &str,
) -> Result<ArticleIdea, ConfigGenerationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ConfigGenerationError::EmptyTitle);
    }

    let model_name = &config.models.config_generation_model;
    info!(title, model = %model_name, "generating article idea");
    let prompt = prompts::idea_prompt(title, &config.business);
    let reply = model.generate_text(model_name, &prompt)?;

    let mut idea: ArticleIdea = parse_json_reply(&reply)?;
    if idea.title.trim().is_empty() {
        idea.title = title.to_string();
    }
    Ok(idea)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genai::backend::tests::MockTextModel;

    const IDEA_JSON: &str = r#"```json
{"title": "Top 5 Web Trends", "topic": "Trends", "keywords": ["web", "ux"],
 "strategic_angle": "Speed", "image_style": "Flat"}
```"#;

    #[test]
    fn generates_idea_from_fenced_reply() {
        let model = MockTextModel::with_replies([IDEA_JSON]);
        let config = GeneratorConfig::default();

        let idea = generate_idea(&model, &config, "Top 5 Web Trends").unwrap();
        assert_eq!(idea.title, "Top 5 Web Trends");
        assert_eq!(idea.keywords, vec!["web", "ux"]);

        let calls = model.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, config.models.config_generation_model);
        assert!(calls[0].prompt.contains("Top 5 Web Trends"));
    }

    #[test]
    fn missing_title_inherits_requested_title() {
        let model = MockTextModel::with_replies([r#"{"topic": "x"}"#]);
        let idea = generate_idea(&model, &GeneratorConfig::default(), "  Why Rust  ").unwrap();
        assert_eq!(idea.title, "Why Rust");
    }

    #[test]
    fn invalid_json_is_config_generation_error() {
        let model = MockTextModel::with_replies(["I cannot help with that."]);
        let result = generate_idea(&model, &GeneratorConfig::default(), "Title");
        assert!(matches!(result, Err(ConfigGenerationError::Parse(_))));
    }

    #[test]
    fn model_failure_is_not_retried() {
        let model = MockTextModel::new();
        model.push_error(GenAiError::QuotaExhausted("429".into()));
        let result = generate_idea(&model, &GeneratorConfig::default(), "Title");
        assert!(matches!(result, Err(ConfigGenerationError::Model(_))));
        assert_eq!(model.get_calls().len(), 1);
    }

    #[test]
    fn empty_title_never_reaches_the_model() {
        let model = MockTextModel::new();
        let result = generate_idea(&model, &GeneratorConfig::default(), "   ");
        assert!(matches!(result, Err(ConfigGenerationError::EmptyTitle)));
        assert!(model.get_calls().is_empty());
    }
}
