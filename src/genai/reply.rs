//! Cleanup of model replies that are supposed to be JSON.
//!
//! Models often wrap JSON in markdown fences even when told not to.

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\n?|```").expect("valid regex"));

/// Remove markdown code fences and surrounding whitespace.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").trim().to_string()
}

/// Strip fences, then parse the reply as JSON.
pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(&strip_code_fences(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn strips_json_fence() {
        let text = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(text), "{\"a\": 1}");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_fences("```\n[1, 2]\n```\n"), "[1, 2]");
    }

    #[test]
    fn leaves_unfenced_text() {
        assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn parse_fenced_reply() {
        let value: Value = parse_json_reply("```json\n{\"title\": \"x\"}```").unwrap();
        assert_eq!(value["title"], "x");
    }

    #[test]
    fn parse_prose_reply_fails() {
        assert!(parse_json_reply::<Value>("Sure! Here is your JSON:").is_err());
    }
}
