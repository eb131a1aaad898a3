//! Article writing: [`Plan`] → markdown with literal placement markers.
//!
//! The model is told to start with the featured marker, skip the H1 title and
//! emit every marker verbatim. Only the last rule is load-bearing for the
//! bundle, so it is checked after every generation:
//!
//! 1. Level-1 headings are removed (the title lives in front matter).
//! 2. Every plan marker must occur at least once. If one is missing the
//!    article is regenerated, up to `api.max_article_attempts` in total.
//! 3. Not starting with the featured marker is only logged.

use crate::config::GeneratorConfig;
use crate::genai::{GenAiError, TextModel};
use crate::naming;
use crate::prompts;
use crate::types::Plan;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ArticleError {
    #[error("Model call failed: {0}")]
    Model(#[from] GenAiError),
    #[error("Could not serialize plan for prompt: {0}")]
    Prompt(#[from] serde_json::Error),
    #[error("Article is missing placement markers: {}", .0.join(", "))]
    MissingMarkers(Vec<String>),
}

/// Write the article for `plan`, regenerating while markers are missing.
pub fn write_article(
    model: &dyn TextModel,
    config: &GeneratorConfig,
    plan: &Plan,
) -> Result<String, ArticleError> {
    let model_name = &config.models.text_model_name;
    let prompt = prompts::article_prompt(plan)?;
    let attempts = config.api.max_article_attempts.max(1);

    let mut missing = Vec::new();
    for attempt in 1..=attempts {
        info!(model = %model_name, attempt, "writing article");
        let reply = model.generate_text(model_name, &prompt)?;
        let article = strip_title_headings(&reply);

        missing = missing_markers(plan, &article);
        if missing.is_empty() {
            if let Some(featured) = naming::featured_marker(&plan.image_plan) {
                if !article.starts_with(featured) {
                    warn!(marker = featured, "article does not start with the featured image marker");
                }
            }
            return Ok(article);
        }
        warn!(attempt, attempts, missing = ?missing, "article is missing placement markers");
    }
    Err(ArticleError::MissingMarkers(missing))
}

/// Plan markers that do not occur anywhere in `article`, in plan order.
///
/// Occurrences are found with [`naming::marker_matcher`], the same matcher
/// bundle assembly substitutes with, so a marker only counts as present when
/// it will actually be replaced.
pub fn missing_markers(plan: &Plan, article: &str) -> Vec<String> {
    let found: HashSet<&str> = naming::marker_matcher(plan.markers())
        .map(|re| re.find_iter(article).map(|m| m.as_str()).collect())
        .unwrap_or_default();
    plan.markers()
        .filter(|m| !found.contains(m))
        .map(str::to_string)
        .collect()
}

/// Remove every level-1 heading (ATX or setext) and trim the result.
pub fn strip_title_headings(markdown: &str) -> String {
    let ranges: Vec<_> = Parser::new(markdown)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => Some(range),
            _ => None,
        })
        .collect();

    let mut out = markdown.to_string();
    for range in ranges.into_iter().rev() {
        out.replace_range(range, "");
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genai::backend::tests::MockTextModel;
    use crate::types::{ImageSpec, Outline};

    fn plan() -> Plan {
        Plan {
            outline: Outline {
                title: "Top 5 Web Trends".into(),
                ..Default::default()
            },
            image_plan: vec![
                ImageSpec {
                    placement_marker: "[FEATURED_IMAGE_MARKER]".into(),
                    generation_prompt: "hero".into(),
                    alt_text: "Hero".into(),
                },
                ImageSpec {
                    placement_marker: "[IN_CONTENT_IMAGE_1_MARKER]".into(),
                    generation_prompt: "chart".into(),
                    alt_text: "Chart".into(),
                },
            ],
        }
    }

    const GOOD: &str = "[FEATURED_IMAGE_MARKER]\n\nSummary.\n\n---\n\n## Speed\n\n[IN_CONTENT_IMAGE_1_MARKER]\n";

    #[test]
    fn strips_atx_title() {
        let md = "# Top 5 Web Trends\n\n[FEATURED_IMAGE_MARKER]\n\n## Section\n";
        assert_eq!(strip_title_headings(md), "[FEATURED_IMAGE_MARKER]\n\n## Section");
    }

    #[test]
    fn strips_setext_title() {
        let md = "Top 5 Web Trends\n================\n\nBody text.\n";
        assert_eq!(strip_title_headings(md), "Body text.");
    }

    #[test]
    fn keeps_lower_level_headings() {
        let md = "### Intro\n\nText\n\n## Section";
        assert_eq!(strip_title_headings(md), md);
    }

    #[test]
    fn missing_markers_in_plan_order() {
        let missing = missing_markers(&plan(), "no markers here");
        assert_eq!(
            missing,
            vec!["[FEATURED_IMAGE_MARKER]", "[IN_CONTENT_IMAGE_1_MARKER]"]
        );
        assert!(missing_markers(&plan(), GOOD).is_empty());
    }

    #[test]
    fn marker_inside_longer_marker_does_not_count() {
        let mut plan = plan();
        for marker in ["IMG", "IMG_2"] {
            plan.image_plan.push(ImageSpec {
                placement_marker: marker.into(),
                generation_prompt: "p".into(),
                alt_text: "a".into(),
            });
        }
        let article = "[FEATURED_IMAGE_MARKER]\n\nA\n\n[IN_CONTENT_IMAGE_1_MARKER]\n\nIMG_2\n\nB";
        assert_eq!(missing_markers(&plan, article), vec!["IMG"]);
    }

    #[test]
    fn valid_article_written_in_one_call() {
        let model = MockTextModel::with_replies([GOOD]);
        let config = GeneratorConfig::default();

        let article = write_article(&model, &config, &plan()).unwrap();
        assert!(article.starts_with("[FEATURED_IMAGE_MARKER]"));

        let calls = model.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, config.models.text_model_name);
    }

    #[test]
    fn regenerates_when_marker_missing() {
        let model = MockTextModel::with_replies(["[FEATURED_IMAGE_MARKER]\n\nNo second image.", GOOD]);
        let article = write_article(&model, &GeneratorConfig::default(), &plan()).unwrap();
        assert!(article.contains("[IN_CONTENT_IMAGE_1_MARKER]"));
        assert_eq!(model.get_calls().len(), 2);
    }

    #[test]
    fn fails_after_max_attempts() {
        let model = MockTextModel::with_replies(["nothing", "still nothing", GOOD]);
        let result = write_article(&model, &GeneratorConfig::default(), &plan());
        match result {
            Err(ArticleError::MissingMarkers(missing)) => assert_eq!(missing.len(), 2),
            other => panic!("expected missing markers, got {other:?}"),
        }
        assert_eq!(model.get_calls().len(), 2);
    }

    #[test]
    fn model_error_propagates() {
        let model = MockTextModel::new();
        let result = write_article(&model, &GeneratorConfig::default(), &plan());
        assert!(matches!(result, Err(ArticleError::Model(_))));
    }
}
