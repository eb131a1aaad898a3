//! Bundle assembly: the final, self-contained post directory.
//!
//! ```text
//! <output_root>/<slug>-<YYYYmmdd-HHMMSS>/
//! ├── index.md              # +++ TOML front matter +++ then the article
//! ├── featured_image.jpg
//! ├── og_image.jpg          # copy of the featured image for link previews
//! ├── image_1.jpg
//! └── image_2.jpg
//! ```
//!
//! Images are moved out of the scratch directory, every marker in the article
//! is replaced by a figure shortcode that points at the moved file, and the
//! front matter is written from the idea and outline.
//!
//! The bundle directory is created exclusively. A name collision is an error,
//! never a merge into an earlier bundle.

use crate::naming::{self, CONTENT_FILENAME, FEATURED_FILENAME, SOCIAL_PREVIEW_FILENAME};
use crate::types::{ArticleIdea, ImageFileMap, Plan};
use chrono::{DateTime, SecondsFormat, TimeZone};
use regex::Captures;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info};

/// Title used when neither the outline nor the idea has one.
pub const UNTITLED: &str = "Untitled Post";

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Front matter serialization failed: {0}")]
    FrontMatter(#[from] toml::ser::Error),
    #[error("Bundle directory already exists: {0}")]
    AlreadyExists(PathBuf),
    #[error("Image for {marker} not found at {path}")]
    MissingImage { marker: String, path: PathBuf },
}

/// Metadata block at the top of `index.md`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrontMatter {
    pub title: String,
    /// RFC 3339 with the local offset.
    pub date: String,
    pub summary: String,
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
}

impl FrontMatter {
    /// Serialize as a `+++`-delimited TOML block.
    pub fn render(&self) -> Result<String, BundleError> {
        let body = toml::to_string(self)?;
        Ok(format!("+++\n{body}+++\n"))
    }
}

/// Outline title, then idea title, then [`UNTITLED`].
pub fn bundle_title<'a>(idea: &'a ArticleIdea, plan: &'a Plan) -> &'a str {
    [plan.outline.title.as_str(), idea.title.as_str()]
        .into_iter()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .unwrap_or(UNTITLED)
}

/// Figure shortcode for one image, padded with blank lines.
pub fn embed_for(filename: &str, alt: &str) -> String {
    let alt = alt.replace('"', "'");
    format!("\n\n{{{{< figure src=\"{filename}\" alt=\"{alt}\" >}}}}\n\n")
}

/// Replace every occurrence of each mapped marker with its embed.
///
/// All markers are replaced in a single pass, longest first, so a marker that
/// is a prefix of another never eats part of it.
pub fn substitute_markers(article: &str, plan: &Plan, images: &ImageFileMap) -> String {
    let embeds: HashMap<&str, String> = images
        .iter()
        .filter_map(|entry| {
            let filename = entry.file_name()?;
            let alt = plan
                .spec_for(&entry.marker)
                .map(|s| s.alt_text.as_str())
                .unwrap_or_default();
            Some((entry.marker.as_str(), embed_for(filename, alt)))
        })
        .collect();
    let Some(matcher) = naming::marker_matcher(embeds.keys().copied()) else {
        return article.trim().to_string();
    };
    matcher
        .replace_all(article, |caps: &Captures| {
            embeds
                .get(&caps[0])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .trim()
        .to_string()
}

/// Move a file, falling back to copy + delete across filesystems.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)
}

/// Assemble the bundle for one post and return its directory.
pub fn assemble_bundle<Tz>(
    output_root: &Path,
    temp_dir: &Path,
    idea: &ArticleIdea,
    plan: &Plan,
    article: &str,
    images: &ImageFileMap,
    now: &DateTime<Tz>,
) -> Result<PathBuf, BundleError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let title = bundle_title(idea, plan);
    let mut moves = Vec::with_capacity(images.len());
    for entry in images.iter() {
        let filename = entry.file_name().filter(|_| entry.path.is_file());
        let Some(filename) = filename else {
            return Err(BundleError::MissingImage {
                marker: entry.marker.clone(),
                path: entry.path.clone(),
            });
        };
        moves.push((entry.path.as_path(), filename));
    }

    fs::create_dir_all(output_root)?;
    let bundle_dir = output_root.join(naming::bundle_name(title, now));
    fs::create_dir(&bundle_dir).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => BundleError::AlreadyExists(bundle_dir.clone()),
        _ => BundleError::Io(e),
    })?;
    info!(dir = %bundle_dir.display(), "assembling bundle");

    let featured = naming::featured_marker(&plan.image_plan).filter(|m| images.get(m).is_some());
    let front_matter = FrontMatter {
        title: title.to_string(),
        date: now.to_rfc3339_opts(SecondsFormat::Secs, false),
        summary: plan.outline.summary.trim().to_string(),
        keywords: idea.keywords.clone(),
        image: featured.map(|_| FEATURED_FILENAME.to_string()),
        og_image: None,
    };
    let body = substitute_markers(article, plan, images);

    if let Err(e) = fill_bundle(&bundle_dir, &moves, front_matter, &body) {
        if let Err(cleanup) = fs::remove_dir_all(&bundle_dir) {
            error!(dir = %bundle_dir.display(), error = %cleanup, "could not remove partial bundle");
        }
        return Err(e);
    }

    if let Err(e) = fs::remove_dir(temp_dir) {
        debug!(dir = %temp_dir.display(), error = %e, "temp image directory kept");
    }
    info!(dir = %bundle_dir.display(), images = images.len(), "bundle written");
    Ok(bundle_dir)
}

/// Move the images into a freshly created bundle and write `index.md`.
///
/// `og_image` is filled in here when the social preview copy succeeds.
fn fill_bundle(
    bundle_dir: &Path,
    moves: &[(&Path, &str)],
    mut front_matter: FrontMatter,
    body: &str,
) -> Result<(), BundleError> {
    for (from, filename) in moves {
        move_file(from, &bundle_dir.join(filename))?;
    }

    if front_matter.image.is_some() {
        let from = bundle_dir.join(FEATURED_FILENAME);
        let to = bundle_dir.join(SOCIAL_PREVIEW_FILENAME);
        match fs::copy(&from, &to) {
            Ok(_) => front_matter.og_image = Some(SOCIAL_PREVIEW_FILENAME.to_string()),
            Err(e) => error!(error = %e, "could not create social preview image"),
        }
    }

    let content = format!("{}\n{}\n", front_matter.render()?, body);
    fs::write(bundle_dir.join(CONTENT_FILENAME), content)?;
    Ok(())
}
