//! Prompt templates for the three text stages.
//!
//! The reply contracts (JSON keys, marker usage) are fixed here; the stages
//! that parse the replies depend on them.

use crate::config::BusinessConfig;
use crate::types::{ArticleIdea, Plan};

/// Prompt turning a bare title into an [`ArticleIdea`] JSON object.
pub fn idea_prompt(title: &str, business: &BusinessConfig) -> String {
    format!(
        r#"You are a strategic content creator for a business described below.

---
BUSINESS CONTEXT:
{context}
---

Your task is to generate a configuration for a blog post based on the following title.

TITLE: "{title}"

Generate the following fields:
1. `title`: Use the exact title provided.
2. `topic`: A detailed paragraph on what the article will cover.
3. `keywords`: A JSON list of 10-12 highly relevant SEO keywords.
4. `target_audience`: A paragraph describing the ideal reader for this article.
5. `strategic_angle`: A paragraph on how this article connects to the business's core services.
6. `image_style`: A paragraph describing the visual style for the article's images.

`topic`, `target_audience`, `strategic_angle`, and `image_style` must each be a single continuous paragraph.
Respond ONLY with a valid JSON object. Example: {{"title": "...", "topic": "...", "keywords": ["kw1", "kw2"], "target_audience": "...", "strategic_angle": "...", "image_style": "..."}}
"#,
        context = business.context.trim(),
    )
}

/// Prompt asking for an outline and an image plan.
pub fn plan_prompt(idea: &ArticleIdea, contact_url: Option<&str>) -> Result<String, serde_json::Error> {
    let idea_json = serde_json::to_string_pretty(idea)?;
    let conclusion_rule = match contact_url {
        Some(url) => format!(
            "- `conclusion`: A concluding section that MUST end with a markdown link: `[contact us to discuss your project]({url})`.\n"
        ),
        None => "- `conclusion`: A concluding section.\n".to_string(),
    };
    let angle = idea.strategic_angle.trim();
    let angle_rule = if angle.is_empty() {
        String::new()
    } else {
        format!("**CRITICAL INSTRUCTION:** Weave this strategic angle throughout the content:\n---\n{angle}\n---\n\n")
    };

    Ok(format!(
        r#"You are a senior content strategist. Create a plan for a blog post based on the configuration below.

**Outline Structure:**
- `title`: The main title.
- `summary`: A concise, 2-3 sentence summary.
- `introduction_heading`: An H3 heading for the introduction.
- `introduction`: Paragraphs for the intro.
- `sections`: An array of objects, each with `title` (H2 heading) and `talking_points`.
{conclusion_rule}
**Image Plan:**
- An array of image objects, each with `placement_marker`, `generation_prompt`, `alt_text`.
- The first image MUST use the marker `[FEATURED_IMAGE_MARKER]`.
- Include at least two other in-content images with unique markers (e.g., `[IN_CONTENT_IMAGE_1_MARKER]`).
- Every `generation_prompt` must follow the configured `image_style`.

{angle_rule}**Full Article Configuration:**
---
{idea_json}
---

Respond ONLY with a single, valid JSON object containing `outline` and `image_plan` keys.
"#
    ))
}

/// Prompt rendering a plan into markdown with literal placement markers.
pub fn article_prompt(plan: &Plan) -> Result<String, serde_json::Error> {
    let plan_json = serde_json::to_string_pretty(plan)?;
    Ok(format!(
        r#"You are a senior tech writer. Write a complete blog post in GitHub Flavored Markdown based *exactly* on the provided JSON plan.

**CRITICAL RULES:**
1. **No Main Title:** Do NOT write a main H1 title ('#').
2. **Start with Featured Image:** The response MUST start with the featured image's `placement_marker`.
3. **Summary Next:** After the marker, write the `summary` as plain text (no blockquotes).
4. **Structure:** Use '---' after the summary, H3 ('###') for the intro heading, and H2 ('##') for section titles.
5. **Place Markers:** You MUST insert every *exact* `placement_marker` string from the image plan (e.g., `[IN_CONTENT_IMAGE_1_MARKER]`) where the visual belongs. DO NOT generate Hugo shortcodes like `{{{{< figure >}}}}`.

**Article Plan (Your Source of Truth):**
---
{plan_json}
---
"#
    ))
}
