//! Best-effort JSON recovery from free-form model output
//!
//! Strategies run in order and the first one that yields a parsed value wins.
//! When none does, the fallback analysis record stands in, so recovery never
//! fails.

use crate::analysis::AnalysisRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

static FENCED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json\s*([\s\S]*?)\s*```").expect("invalid fenced json regex"));

type Strategy = fn(&str) -> Option<Value>;

const STRATEGIES: &[(&str, Strategy)] = &[("fenced_json", fenced_json), ("brace_span", brace_span)];

/// Recover a JSON value from `text`.
pub fn recover_json(text: &str) -> Value {
    STRATEGIES
        .iter()
        .find_map(|(name, strategy)| {
            let value = strategy(text)?;
            debug!(strategy = *name, "recovered JSON from response text");
            Some(value)
        })
        .unwrap_or_else(|| {
            warn!("no JSON could be recovered, using fallback analysis");
            AnalysisRecord::fallback().to_value()
        })
}

/// Interior of the first ```` ```json ```` fence, if it parses.
fn fenced_json(text: &str) -> Option<Value> {
    let captures = FENCED_JSON.captures(text)?;
    serde_json::from_str(captures.get(1)?.as_str()).ok()
}

/// Span from the first `{` to the last `}`, if it parses.
fn brace_span(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fenced_block_wins() {
        let text = "Sure! Here it is:\n```json\n{\"experiment_type\": \"sorting\"}\n```\nand also {\"other\": 1}";
        assert_eq!(recover_json(text), json!({ "experiment_type": "sorting" }));
    }

    #[test]
    fn test_fenced_block_inline() {
        let text = "Sure! ```json\n{\"experiment_type\":\"sorting\",\"main_goal\":\"sort numbers\",\"key_requirements\":[\"use quicksort\"],\"programming_language\":\"C\"}\n```";
        assert_eq!(
            recover_json(text),
            json!({
                "experiment_type": "sorting",
                "main_goal": "sort numbers",
                "key_requirements": ["use quicksort"],
                "programming_language": "C"
            })
        );
    }

    #[test]
    fn test_invalid_fence_falls_through_to_braces() {
        // The fence holds broken JSON; the brace span covers a valid object.
        let text = "{\"a\": 1}\n```json\nnot json\n```";
        assert_eq!(recover_json(text), json!({ "a": 1 }));
    }

    #[test]
    fn test_uppercase_marker_is_not_a_json_fence() {
        let text = "```JSON\n{\"a\": 1}\n```";
        assert_eq!(fenced_json(text), None);
        assert_eq!(recover_json(text), json!({ "a": 1 }));
    }

    #[test]
    fn test_brace_span() {
        let text = "The analysis is {\"main_goal\": \"build a {nested} parser\", \"x\": {\"y\": 2}} hope this helps";
        assert_eq!(
            recover_json(text),
            json!({ "main_goal": "build a {nested} parser", "x": { "y": 2 } })
        );
    }

    #[test]
    fn test_brace_span_spans_first_to_last() {
        // Two separate objects: the combined span is not valid JSON.
        assert_eq!(brace_span("{\"a\": 1} and {\"b\": 2}"), None);
        assert_eq!(brace_span("} backwards {"), None);
    }

    #[test]
    fn test_fallback() {
        let expected = AnalysisRecord::fallback().to_value();
        assert_eq!(recover_json("no json here at all"), expected);
        assert_eq!(recover_json(""), expected);
        assert_eq!(recover_json("{ broken"), expected);
        assert_eq!(recover_json("实验要求：无 }{"), expected);

        let obj = expected.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert!(obj["key_requirements"].is_array());
    }
}
