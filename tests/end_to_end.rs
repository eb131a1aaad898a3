//! Full run through the public library API with scripted models.
//!
//! The text model answers the three text stages with fixed replies; the
//! image model fails every call, so every image must become a placeholder
//! and the title must still produce a complete bundle.

use hugo_postgen::config::GeneratorConfig;
use hugo_postgen::genai::{GenAiError, ImageModel, TextModel};
use hugo_postgen::pacing::Pacer;
use hugo_postgen::pipeline::{Pipeline, TitleOutcome};
use hugo_postgen::titles;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

const IDEA: &str = r#"```json
{
  "title": "Top 5 Web Trends",
  "topic": "The trends shaping the web this year.",
  "keywords": ["web design", "performance", "accessibility"],
  "target_audience": "Small business owners planning a redesign.",
  "strategic_angle": "Fast, accessible sites win customers.",
  "image_style": "Flat isometric illustrations in brand blue."
}
```"#;

const PLAN: &str = r#"{
  "outline": {
    "title": "Top 5 Web Trends",
    "summary": "Five shifts every site owner should know about.",
    "introduction_heading": "Why trends matter",
    "introduction": "The web changes quickly.",
    "sections": [
      {"title": "Speed", "talking_points": ["Core Web Vitals", "Edge hosting"]},
      {"title": "Accessibility", "talking_points": "Inclusive design is good business."}
    ],
    "conclusion": "Ready to modernize? [contact us to discuss your project](https://example.com/#contact)"
  },
  "image_plan": [
    {"placement_marker": "[FEATURED_IMAGE_MARKER]", "generation_prompt": "Isometric web dashboard", "alt_text": "Dashboard"},
    {"placement_marker": "[IN_CONTENT_IMAGE_1_MARKER]", "generation_prompt": "Speedometer made of code", "alt_text": "Speed \"gauge\""}
  ]
}"#;

const ARTICLE: &str = "[FEATURED_IMAGE_MARKER]

Five shifts every site owner should know about.

---

### Why trends matter

The web changes quickly.

## Speed

[IN_CONTENT_IMAGE_1_MARKER]

Core Web Vitals decide rankings.

## Accessibility

Inclusive design is good business.
";

/// Replies to each text call in turn.
struct ScriptedText {
    replies: Mutex<Vec<&'static str>>,
}

impl ScriptedText {
    fn new(replies: &[&'static str]) -> Self {
        let mut replies = replies.to_vec();
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
        }
    }
}

impl TextModel for ScriptedText {
    fn generate_text(&self, _model: &str, _prompt: &str) -> Result<String, GenAiError> {
        self.replies
            .lock()
            .unwrap()
            .pop()
            .map(str::to_string)
            .ok_or_else(|| GenAiError::InvalidResponse("script exhausted".to_string()))
    }
}

/// Image service that is permanently out of quota.
#[derive(Default)]
struct ThrottledImages {
    calls: Mutex<usize>,
}

impl ImageModel for ThrottledImages {
    fn generate_image(&self, _model: &str, _prompt: &str) -> Result<Vec<u8>, GenAiError> {
        *self.calls.lock().unwrap() += 1;
        Err(GenAiError::QuotaExhausted("RESOURCE_EXHAUSTED".to_string()))
    }
}

#[derive(Default)]
struct NoWait {
    pauses: Mutex<Vec<Duration>>,
}

impl Pacer for NoWait {
    fn pause(&self, duration: Duration) {
        self.pauses.lock().unwrap().push(duration);
    }
}

fn config_in(root: &Path) -> GeneratorConfig {
    let mut config = GeneratorConfig::default();
    config.paths.temp_image_dir = root.join("temp_images");
    config.api.call_delay_seconds = 0;
    config.api.interval_between_posts_seconds = 0;
    config
}

#[test]
fn csv_title_becomes_bundle_with_placeholder_images() {
    let tmp = TempDir::new().unwrap();
    let csv_path = tmp.path().join("titles.csv");
    fs::write(&csv_path, "title\n\"Top 5 Web Trends\"\n").unwrap();
    let output_root = tmp.path().join("content").join("posts");

    let titles = titles::load_titles(&csv_path).unwrap();
    assert_eq!(titles, vec!["Top 5 Web Trends"]);

    let config = config_in(tmp.path());
    let text = ScriptedText::new(&[IDEA, PLAN, ARTICLE]);
    let images = ThrottledImages::default();
    let pacer = NoWait::default();
    let summary = Pipeline::new(&config, &text, &images, &pacer).run(&titles, &output_root);

    assert_eq!(summary.successful(), 1);
    assert_eq!(summary.failed(), 0);
    let report = match &summary.outcomes[0] {
        TitleOutcome::Succeeded { report, .. } => report.clone(),
        other => panic!("title failed: {other:?}"),
    };
    assert_eq!(report.placeholders, 2);

    // Exactly one bundle.
    let bundles: Vec<_> = fs::read_dir(&output_root).unwrap().map(|e| e.unwrap().path()).collect();
    assert_eq!(bundles, vec![report.bundle.clone()]);
    let name = report.bundle.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("top-5-web-trends-"), "unexpected bundle name {name}");

    // Front matter title, no markers left in the body.
    let content = fs::read_to_string(report.bundle.join("index.md")).unwrap();
    let front_matter = content
        .strip_prefix("+++\n")
        .and_then(|rest| rest.split_once("+++\n"))
        .map(|(fm, _)| fm)
        .unwrap();
    let front_matter: toml::Value = toml::from_str(front_matter).unwrap();
    assert_eq!(front_matter["title"].as_str(), Some("Top 5 Web Trends"));
    assert!(!content.contains("[FEATURED_IMAGE_MARKER]"));
    assert!(!content.contains("[IN_CONTENT_IMAGE_1_MARKER]"));
    assert!(content.contains("{{< figure src=\"image_1.jpg\" alt=\"Speed 'gauge'\" >}}"));

    // Two placeholder images plus the social preview copy.
    for file in ["featured_image.jpg", "image_1.jpg", "og_image.jpg"] {
        let img = image::open(report.bundle.join(file)).unwrap();
        assert_eq!((img.width(), img.height()), (1200, 630), "{file}");
    }

    // Three quota attempts per image, never a fourth.
    assert_eq!(*images.calls.lock().unwrap(), 6);
    let backoffs: Vec<u64> = pacer
        .pauses
        .lock()
        .unwrap()
        .iter()
        .map(Duration::as_secs)
        .filter(|s| *s > 0)
        .collect();
    assert_eq!(backoffs, vec![2, 4, 2, 4]);
}

#[test]
fn unusable_plan_fails_title_without_bundle() {
    let tmp = TempDir::new().unwrap();
    let output_root = tmp.path().join("posts");
    let config = config_in(tmp.path());
    let text = ScriptedText::new(&[IDEA, r#"{"outline": {"title": "No images"}}"#]);
    let images = ThrottledImages::default();
    let pacer = NoWait::default();

    let summary = Pipeline::new(&config, &text, &images, &pacer)
        .run(&["Top 5 Web Trends".to_string()], &output_root);

    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.outcomes[0].title(), "Top 5 Web Trends");
    assert_eq!(*images.calls.lock().unwrap(), 0);
    assert!(!output_root.exists());
}
