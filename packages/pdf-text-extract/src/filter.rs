//! Structured-text filter.
//!
//! Flattens the extract operation's `structuredData.json` into the ordered
//! list of `"Text"` values found under `"elements"`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const ELEMENTS_KEY: &str = "elements";
const TEXT_KEY: &str = "Text";

/// How far below the root `"elements"` array the filter looks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    /// Only items directly inside the root node's `"elements"` array.
    #[default]
    Shallow,
    /// Every element reachable through nested `"elements"` arrays, pre-order:
    /// an element's own text comes before its children's.
    Recursive,
}

/// The file written at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOutput {
    #[serde(rename = "textElements")]
    pub text_elements: Vec<String>,
}

impl TextOutput {
    pub fn new(text_elements: Vec<String>) -> Self {
        Self { text_elements }
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Collect text fragments from a structured document tree.
///
/// Never fails: a missing or non-array `"elements"`, non-object items and
/// non-string `"Text"` values are skipped. Empty strings are kept.
pub fn extract_text(document: &Value, mode: FilterMode) -> Vec<String> {
    let mut fragments = Vec::new();
    collect(document, mode, &mut fragments);
    fragments
}

fn collect(node: &Value, mode: FilterMode, out: &mut Vec<String>) {
    let Some(items) = node.get(ELEMENTS_KEY).and_then(Value::as_array) else {
        return;
    };

    for item in items.iter().filter(|item| item.is_object()) {
        if let Some(text) = item.get(TEXT_KEY).and_then(Value::as_str) {
            out.push(text.to_string());
        }
        if mode == FilterMode::Recursive {
            collect(item, mode, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keeps_text_items_in_order() {
        let doc = json!({ "elements": [ {"Text": "A"}, {"Foo": 1}, {"Text": "B"} ] });
        assert_eq!(extract_text(&doc, FilterMode::Shallow), vec!["A", "B"]);
    }

    #[test]
    fn test_counts_only_items_with_text() {
        let doc = json!({
            "elements": [
                {"Text": "one", "Path": "//Document/H1"},
                {"Path": "//Document/Figure"},
                {"Text": "two"},
                {"Bounds": [0, 0, 1, 1]},
                {"Text": "three"}
            ]
        });
        let out = extract_text(&doc, FilterMode::Shallow);
        assert_eq!(out, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_empty_elements() {
        let doc = json!({ "elements": [] });
        assert!(extract_text(&doc, FilterMode::Shallow).is_empty());
        assert!(extract_text(&doc, FilterMode::Recursive).is_empty());
    }

    #[test]
    fn test_missing_elements() {
        let doc = json!({});
        assert!(extract_text(&doc, FilterMode::Shallow).is_empty());
        assert!(extract_text(&doc, FilterMode::Recursive).is_empty());
    }

    #[test]
    fn test_non_object_root_and_non_array_elements() {
        assert!(extract_text(&json!([{"Text": "x"}]), FilterMode::Recursive).is_empty());
        assert!(extract_text(&json!("text"), FilterMode::Shallow).is_empty());
        assert!(extract_text(&json!({"elements": {"Text": "x"}}), FilterMode::Shallow).is_empty());
    }

    #[test]
    fn test_non_object_items_skipped() {
        let doc = json!({ "elements": [ "loose", 3, null, ["Text"], {"Text": "kept"} ] });
        assert_eq!(extract_text(&doc, FilterMode::Shallow), vec!["kept"]);
    }

    #[test]
    fn test_empty_string_text_kept() {
        let doc = json!({ "elements": [ {"Text": ""}, {"Text": "after"} ] });
        assert_eq!(extract_text(&doc, FilterMode::Shallow), vec!["", "after"]);
    }

    #[test]
    fn test_non_string_text_skipped() {
        let doc = json!({ "elements": [ {"Text": 5}, {"Text": null}, {"Text": "s"} ] });
        assert_eq!(extract_text(&doc, FilterMode::Shallow), vec!["s"]);
    }

    #[test]
    fn test_duplicates_not_merged() {
        let doc = json!({ "elements": [ {"Text": "same"}, {"Text": "same"} ] });
        assert_eq!(extract_text(&doc, FilterMode::Shallow), vec!["same", "same"]);
    }

    #[test]
    fn test_nested_shallow_ignores_children() {
        let doc = json!({ "elements": [ { "elements": [ {"Text": "deep"} ] } ] });
        assert!(extract_text(&doc, FilterMode::Shallow).is_empty());
    }

    #[test]
    fn test_nested_recursive_reaches_children() {
        let doc = json!({ "elements": [ { "elements": [ {"Text": "deep"} ] } ] });
        assert_eq!(extract_text(&doc, FilterMode::Recursive), vec!["deep"]);
    }

    #[test]
    fn test_recursive_is_pre_order() {
        let doc = json!({
            "elements": [
                {
                    "Text": "parent",
                    "elements": [
                        {"Text": "child-1", "elements": [ {"Text": "grandchild"} ]},
                        {"Text": "child-2"}
                    ]
                },
                {"Text": "sibling"}
            ]
        });
        assert_eq!(
            extract_text(&doc, FilterMode::Recursive),
            vec!["parent", "child-1", "grandchild", "child-2", "sibling"]
        );
        assert_eq!(
            extract_text(&doc, FilterMode::Shallow),
            vec!["parent", "sibling"]
        );
    }

    #[test]
    fn test_output_round_trip() {
        let output = TextOutput::new(vec!["A".into(), "".into(), "B".into()]);
        let json = output.to_json_pretty().unwrap();
        let reparsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(reparsed, json!({ "textElements": ["A", "", "B"] }));
        assert!(json.contains("\n  \"textElements\""));
    }
}
