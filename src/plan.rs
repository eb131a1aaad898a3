//! Plan generation: [`ArticleIdea`] → [`Plan`] (outline + image plan).
//!
//! ## Validation
//!
//! The reply must be a JSON object carrying both `outline` and `image_plan`.
//! Beyond that, every placement marker must be a non-blank string and no two
//! specs may share a marker, since markers are substituted by exact match
//! later on. Any violation is a [`PlanError::Validation`].

use crate::config::GeneratorConfig;
use crate::genai::{GenAiError, TextModel, parse_json_reply};
use crate::prompts;
use crate::types::{ArticleIdea, Plan};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Model call failed: {0}")]
    Model(#[from] GenAiError),
    #[error("Reply is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Plan validation error: {0}")]
    Validation(String),
}

/// Generate and validate the plan for an idea.
pub fn generate_plan(
    model: &dyn TextModel,
    config: &GeneratorConfig,
    idea: &ArticleIdea,
) -> Result<Plan, PlanError> {
    let model_name = &config.models.text_model_name;
    info!(model = %model_name, "generating outline and image plan");
    let prompt = prompts::plan_prompt(idea, config.business.contact_url.as_deref())?;
    let reply = model.generate_text(model_name, &prompt)?;
    let plan = parse_plan(&reply)?;
    info!(
        sections = plan.outline.sections.len(),
        images = plan.image_plan.len(),
        "plan generated"
    );
    Ok(plan)
}

/// Parse a raw model reply into a validated plan.
pub fn parse_plan(reply: &str) -> Result<Plan, PlanError> {
    let value: Value = parse_json_reply(reply)?;
    for key in ["outline", "image_plan"] {
        if value.get(key).is_none() {
            return Err(PlanError::Validation(format!(
                "generated plan is missing '{key}'"
            )));
        }
    }
    let plan: Plan = serde_json::from_value(value)?;
    validate_markers(&plan)?;
    Ok(plan)
}

fn validate_markers(plan: &Plan) -> Result<(), PlanError> {
    let mut seen = HashSet::new();
    for marker in plan.markers() {
        if marker.trim().is_empty() {
            return Err(PlanError::Validation(
                "image plan contains a blank placement marker".to_string(),
            ));
        }
        if !seen.insert(marker) {
            return Err(PlanError::Validation(format!(
                "placement marker {marker} is used more than once"
            )));
        }
    }
    Ok(())
}
