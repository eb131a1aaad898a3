//! Naming conventions for bundles and image files.
//!
//! ## Bundle Directories
//!
//! A bundle is named after its title, slugified, plus a second-resolution
//! timestamp so repeated runs never land in the same directory:
//!
//! - `"Hello, World!"` at 2024-03-05 14:07:09 → `hello-world-20240305-140709`
//! - `"!!!"` has no slug characters and falls back to `untitled-20240305-140709`
//!
//! ## Image Files
//!
//! The image spec whose marker contains `featured` (case-insensitive) becomes
//! [`FEATURED_FILENAME`]. If several markers match, the first one in plan order
//! wins. Every other spec is numbered in the order encountered:
//! `image_1.jpg`, `image_2.jpg`, ...

use chrono::{DateTime, TimeZone};
use regex::Regex;
use std::sync::LazyLock;

use crate::types::ImageSpec;

/// File name of the featured image inside a bundle.
pub const FEATURED_FILENAME: &str = "featured_image.jpg";
/// Copy of the featured image used for social link previews.
pub const SOCIAL_PREVIEW_FILENAME: &str = "og_image.jpg";
/// Content file written into every bundle.
pub const CONTENT_FILENAME: &str = "index.md";
/// Bundle name stem for titles that slugify to nothing.
pub const UNTITLED_SLUG: &str = "untitled";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static NON_SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\-]").expect("valid regex"));

/// Convert text to a URL-friendly slug.
///
/// Lowercases, turns each whitespace run into a hyphen, drops everything that
/// is not a word character or hyphen, and trims hyphens from both ends.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let hyphenated = WHITESPACE.replace_all(&lower, "-");
    let cleaned = NON_SLUG.replace_all(&hyphenated, "");
    cleaned.trim_matches('-').to_string()
}

/// Unique bundle directory name for `title` created at `at`.
pub fn bundle_name<Tz>(title: &str, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let slug = slugify(title);
    let stem = if slug.is_empty() { UNTITLED_SLUG } else { &slug };
    format!("{}-{}", stem, at.format("%Y%m%d-%H%M%S"))
}

/// Pattern matching any of `markers` verbatim.
///
/// Longer markers are tried first, so `[IMG_2]` is never read as `[IMG]`
/// followed by stray text. Returns `None` when there is nothing to match or
/// the pattern would exceed the regex size limit.
pub fn marker_matcher<'a>(markers: impl IntoIterator<Item = &'a str>) -> Option<Regex> {
    let mut markers: Vec<&str> = markers.into_iter().filter(|m| !m.is_empty()).collect();
    if markers.is_empty() {
        return None;
    }
    markers.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    markers.dedup();
    let alternation = markers
        .iter()
        .map(|m| regex::escape(m))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation).ok()
}

/// Whether a marker denotes the featured image.
pub fn is_featured_marker(marker: &str) -> bool {
    marker.to_lowercase().contains("featured")
}

/// First marker in plan order that denotes the featured image.
pub fn featured_marker(specs: &[ImageSpec]) -> Option<&str> {
    specs
        .iter()
        .map(|s| s.placement_marker.as_str())
        .find(|m| is_featured_marker(m))
}

/// Assign a stable file name to every image spec, in plan order.
pub fn assign_filenames(specs: &[ImageSpec]) -> Vec<(String, String)> {
    let featured = featured_marker(specs);
    let mut counter = 0;
    specs
        .iter()
        .map(|spec| {
            let marker = spec.placement_marker.clone();
            if Some(marker.as_str()) == featured {
                (marker, FEATURED_FILENAME.to_string())
            } else {
                counter += 1;
                (marker, format!("image_{counter}.jpg"))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn spec(marker: &str) -> ImageSpec {
        ImageSpec {
            placement_marker: marker.to_string(),
            generation_prompt: format!("prompt for {marker}"),
            alt_text: String::new(),
        }
    }

    #[test]
    fn slugify_strips_punctuation() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
    }

    #[test]
    fn slugify_collapses_whitespace_runs() {
        assert_eq!(slugify("Top   5\tWeb\nTrends"), "top-5-web-trends");
    }

    #[test]
    fn slugify_trims_edge_hyphens() {
        assert_eq!(slugify("  -Why Rust?- "), "why-rust");
    }

    #[test]
    fn slugify_keeps_unicode_word_characters() {
        assert_eq!(slugify("Café Déjà Vu"), "café-déjà-vu");
    }

    #[test]
    fn slugify_empty_and_symbol_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn bundle_name_appends_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        assert_eq!(bundle_name("Hello, World!", &at), "hello-world-20240305-140709");
    }

    #[test]
    fn bundle_name_falls_back_for_symbol_only_titles() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        assert_eq!(bundle_name("!!!", &at), "untitled-20240305-140709");
        assert_eq!(bundle_name("  ", &at), "untitled-20240305-140709");
    }

    #[test]
    fn marker_matcher_prefers_longest_marker() {
        let re = marker_matcher(["IMG", "IMG_2", "FEATURED"]).unwrap();
        let found: Vec<&str> = re.find_iter("FEATURED a IMG_2 b IMG").map(|m| m.as_str()).collect();
        assert_eq!(found, vec!["FEATURED", "IMG_2", "IMG"]);
    }

    #[test]
    fn marker_matcher_escapes_brackets() {
        let re = marker_matcher(["[IMG.1]"]).unwrap();
        assert!(re.is_match("see [IMG.1] here"));
        assert!(!re.is_match("see IMG.1 or [IMGx1]"));
    }

    #[test]
    fn marker_matcher_needs_markers() {
        assert!(marker_matcher([]).is_none());
        assert!(marker_matcher([""]).is_none());
    }

    #[test]
    fn bundle_name_differs_across_timestamps() {
        let first = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 10).unwrap();
        assert_ne!(
            bundle_name("Hello, World!", &first),
            bundle_name("Hello, World!", &second)
        );
    }

    #[test]
    fn bundle_name_uses_local_wall_clock_of_offset() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let at = tz.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(bundle_name("New Year", &at), "new-year-20241231-235959");
    }

    #[test]
    fn featured_marker_is_case_insensitive() {
        assert!(is_featured_marker("[FEATURED_IMAGE_MARKER]"));
        assert!(is_featured_marker("[my_Featured_shot]"));
        assert!(!is_featured_marker("[IN_CONTENT_IMAGE_1_MARKER]"));
    }

    #[test]
    fn assign_filenames_featured_first() {
        let specs = vec![
            spec("[FEATURED_IMAGE_MARKER]"),
            spec("[IN_CONTENT_IMAGE_1_MARKER]"),
            spec("[IN_CONTENT_IMAGE_2_MARKER]"),
        ];
        let names = assign_filenames(&specs);
        assert_eq!(
            names,
            vec![
                ("[FEATURED_IMAGE_MARKER]".to_string(), "featured_image.jpg".to_string()),
                ("[IN_CONTENT_IMAGE_1_MARKER]".to_string(), "image_1.jpg".to_string()),
                ("[IN_CONTENT_IMAGE_2_MARKER]".to_string(), "image_2.jpg".to_string()),
            ]
        );
    }

    #[test]
    fn assign_filenames_featured_not_first() {
        let specs = vec![spec("[A]"), spec("[FEATURED]"), spec("[B]")];
        let names: Vec<String> = assign_filenames(&specs).into_iter().map(|(_, f)| f).collect();
        assert_eq!(names, vec!["image_1.jpg", "featured_image.jpg", "image_2.jpg"]);
    }

    #[test]
    fn assign_filenames_without_featured() {
        let specs = vec![spec("[A]"), spec("[B]")];
        let names: Vec<String> = assign_filenames(&specs).into_iter().map(|(_, f)| f).collect();
        assert!(!names.iter().any(|n| n == FEATURED_FILENAME));
        assert_eq!(names, vec!["image_1.jpg", "image_2.jpg"]);
    }

    #[test]
    fn assign_filenames_first_featured_match_wins() {
        let specs = vec![spec("[FEATURED_HERO]"), spec("[featured_alt]")];
        let names = assign_filenames(&specs);
        assert_eq!(names[0].1, FEATURED_FILENAME);
        assert_eq!(names[1].1, "image_1.jpg");
        let featured_count = names.iter().filter(|(_, f)| f == FEATURED_FILENAME).count();
        assert_eq!(featured_count, 1);
    }

    #[test]
    fn assign_filenames_one_entry_per_spec() {
        let specs: Vec<ImageSpec> = (0..6).map(|i| spec(&format!("[IMG_{i}]"))).collect();
        assert_eq!(assign_filenames(&specs).len(), specs.len());
    }
}
