//! Recovery of structured values from free-form model output.
//!
//! The model is asked for bare JSON but may wrap it in a Markdown fence or
//! ignore the instruction entirely. Everything here degrades to an empty
//! value instead of failing.

use serde_json::{Map, Value};

const FENCE_OPEN: &str = "```json\n";
const FENCE_CLOSE: &str = "\n```";

/// Remove a ```` ```json ```` fence by exact substring removal.
///
/// Only the literal opening and closing markers are removed (every
/// occurrence); other fence styles are left alone.
pub fn strip_json_fence(text: &str) -> String {
    text.trim().replace(FENCE_OPEN, "").replace(FENCE_CLOSE, "")
}

/// Parse model output as JSON after fence stripping.
pub fn parse_json(text: &str) -> Option<Value> {
    let cleaned = strip_json_fence(text);
    match serde_json::from_str(&cleaned) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Model output is not valid JSON: {}", e);
            None
        }
    }
}

/// Candidate food names from a `{"predictions": [...]}` answer.
///
/// Order is preserved and nothing is truncated. Non-string entries are
/// skipped.
pub fn predictions(text: &str) -> Vec<String> {
    let Some(value) = parse_json(text) else {
        return Vec::new();
    };

    match value.get("predictions") {
        // Only strings are kept; numbers or nulls in the list are dropped
        // rather than passed through to the facade.
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => {
            tracing::warn!("Model output has no \"predictions\" list");
            Vec::new()
        }
    }
}

/// The JSON object of a nutrition answer, or an empty map.
pub fn json_object(text: &str) -> Map<String, Value> {
    match parse_json(text) {
        Some(Value::Object(map)) => map,
        Some(_) => {
            tracing::warn!("Model output is JSON but not an object");
            Map::new()
        }
        None => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_fence_exact_markers() {
        assert_eq!(
            strip_json_fence("```json\n{\"a\": 1}\n```"),
            "{\"a\": 1}"
        );
    }

    #[test]
    fn test_strip_fence_trims_surrounding_whitespace() {
        assert_eq!(
            strip_json_fence("  \n```json\n{}\n```\n  "),
            "{}"
        );
    }

    #[test]
    fn test_strip_fence_leaves_other_fences() {
        assert_eq!(strip_json_fence("```\n{}\n```"), "```\n{}");
    }

    #[test]
    fn test_predictions_in_order() {
        assert_eq!(
            predictions(r#"{"predictions": ["A", "B", "C"]}"#),
            vec!["A", "B", "C"]
        );
    }

    #[test]
    fn test_fenced_and_plain_parse_identically() {
        let plain = r#"{"predictions": ["Ramen", "Pho"]}"#;
        let fenced = format!("```json\n{}\n```", plain);
        assert_eq!(predictions(&fenced), predictions(plain));
        assert_eq!(json_object(&fenced), json_object(plain));
    }

    #[test]
    fn test_invalid_json_yields_empty() {
        assert!(predictions("I think this is a pizza.").is_empty());
        assert!(json_object("Sorry, I can't help with that.").is_empty());
        assert!(predictions("").is_empty());
    }

    #[test]
    fn test_missing_or_wrong_predictions_yield_empty() {
        assert!(predictions(r#"{"guesses": ["Pizza"]}"#).is_empty());
        assert!(predictions(r#"{"predictions": "Pizza"}"#).is_empty());
        assert!(predictions(r#"["Pizza"]"#).is_empty());
    }

    #[test]
    fn test_predictions_not_truncated() {
        let names = predictions(r#"{"predictions": ["1","2","3","4","5","6","7"]}"#);
        assert_eq!(names.len(), 7);
    }

    #[test]
    fn test_predictions_skip_non_strings() {
        assert_eq!(
            predictions(r#"{"predictions": ["Curry", 3, null, "Dal"]}"#),
            vec!["Curry", "Dal"]
        );
    }

    #[test]
    fn test_json_object_passes_partial_records_through() {
        let map = json_object(r#"{"food_name": "Apple", "calories": 95}"#);
        assert_eq!(map.len(), 2);
        assert_eq!(map["calories"], 95);
    }

    #[test]
    fn test_json_object_rejects_non_objects() {
        assert!(json_object("[1, 2]").is_empty());
        assert!(json_object("42").is_empty());
    }
}
