//! Data handed from stage to stage.
//!
//! Each stage owns its output and passes it forward: title → [`ArticleIdea`]
//! → [`Plan`] → article markdown → [`ImageFileMap`] → bundle. Nothing here is
//! mutated after the stage that produced it returns.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Structured article configuration produced from a bare title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleIdea {
    pub title: String,
    /// What the article covers, as one paragraph.
    pub topic: String,
    pub keywords: Vec<String>,
    /// Ideal reader, when the model supplies one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    /// How the article ties back to the business. Woven through the plan.
    #[serde(alias = "azlo_strategic_angle")]
    pub strategic_angle: String,
    /// Visual direction shared by every image prompt.
    pub image_style: String,
}

/// Outline plus image plan for one article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub outline: Outline,
    pub image_plan: Vec<ImageSpec>,
}

impl Plan {
    /// Look up the spec for a marker (exact match).
    pub fn spec_for(&self, marker: &str) -> Option<&ImageSpec> {
        self.image_plan.iter().find(|s| s.placement_marker == marker)
    }

    /// All placement markers in plan order.
    pub fn markers(&self) -> impl Iterator<Item = &str> {
        self.image_plan.iter().map(|s| s.placement_marker.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Outline {
    pub title: String,
    pub summary: String,
    pub introduction_heading: String,
    pub introduction: String,
    pub sections: Vec<Section>,
    pub conclusion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    pub title: String,
    /// Models return either a list or a single paragraph here.
    #[serde(deserialize_with = "one_or_many")]
    pub talking_points: Vec<String>,
}

/// One image slot in the article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSpec {
    /// Literal token the article carries where the image belongs,
    /// e.g. `[FEATURED_IMAGE_MARKER]`.
    pub placement_marker: String,
    pub generation_prompt: String,
    #[serde(default)]
    pub alt_text: String,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

/// An image file produced for one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct ProducedImage {
    pub marker: String,
    pub path: PathBuf,
    /// True when the file is a locally rendered fallback.
    pub placeholder: bool,
}

impl ProducedImage {
    /// File name component of the path.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

/// Marker → file mapping in plan order, one entry per image spec.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageFileMap {
    entries: Vec<ProducedImage>,
}

impl ImageFileMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, marker: impl Into<String>, path: impl Into<PathBuf>, placeholder: bool) {
        self.entries.push(ProducedImage {
            marker: marker.into(),
            path: path.into(),
            placeholder,
        });
    }

    pub fn get(&self, marker: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|e| e.marker == marker)
            .map(|e| e.path.as_path())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProducedImage> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn placeholder_count(&self) -> usize {
        self.entries.iter().filter(|e| e.placeholder).count()
    }
}
