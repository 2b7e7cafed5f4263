//! Response parsing: model reply text → JSON document.
//!
//! Despite being told to answer with bare JSON, chat models sometimes wrap
//! the object in a ```` ```json ```` fence. A single outer fence is removed
//! before parsing; anything else that is not JSON is an error.

use crate::error::ConvertError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static RE_OUTER_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[A-Za-z]*[ \t]*\r?\n(.*?)\r?\n?```$").unwrap());

/// Remove one outer Markdown code fence, if the whole reply is fenced.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    match RE_OUTER_FENCE.captures(trimmed).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => trimmed,
    }
}

/// Parse the reply text as JSON.
pub fn parse_document(raw: &str, strip_fences: bool) -> Result<Value, ConvertError> {
    let text = if strip_fences {
        strip_code_fences(raw)
    } else {
        raw
    };
    serde_json::from_str(text).map_err(|e| ConvertError::ResponseNotJson {
        snippet: snippet(raw),
        source: e,
    })
}

/// The message of a model-emitted `{"error": "..."}` reply.
///
/// Only an object whose sole key is `error` with a string value counts; a
/// converted widget that happens to carry an `error` field does not.
pub fn model_error(document: &Value) -> Option<&str> {
    let obj = document.as_object()?;
    if obj.len() != 1 {
        return None;
    }
    obj.get("error")?.as_str()
}

fn snippet(raw: &str) -> String {
    const MAX: usize = 80;
    let trimmed = raw.trim();
    match trimmed.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}\u{2026}", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strip_json_fence() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn strip_bare_fence() {
        assert_eq!(strip_code_fences("  ```\n[1]\n```  "), "[1]");
    }

    #[test]
    fn unfenced_passthrough() {
        assert_eq!(strip_code_fences(" {\"a\":1}\n"), "{\"a\":1}");
    }

    #[test]
    fn parse_fenced_reply() {
        let v = parse_document("```json\n{\"id\":\"x\"}\n```", true).unwrap();
        assert_eq!(v, json!({"id": "x"}));
    }

    #[test]
    fn fenced_reply_fails_when_stripping_disabled() {
        let err = parse_document("```json\n{}\n```", false).unwrap_err();
        assert!(matches!(err, ConvertError::ResponseNotJson { .. }));
    }

    #[test]
    fn prose_is_not_json() {
        let err = parse_document("Here is your widget: {}", true).unwrap_err();
        match err {
            ConvertError::ResponseNotJson { snippet, .. } => {
                assert!(snippet.starts_with("Here is"))
            }
            other => panic!("expected ResponseNotJson, got {other:?}"),
        }
    }

    #[test]
    fn snippet_is_truncated() {
        let long = "x".repeat(200);
        let s = snippet(&long);
        assert_eq!(s.chars().count(), 81);
        assert!(s.ends_with('\u{2026}'));
    }

    #[test]
    fn model_error_detection() {
        assert_eq!(model_error(&json!({"error": "bad input"})), Some("bad input"));
        assert_eq!(model_error(&json!({"error": "x", "id": "1"})), None);
        assert_eq!(model_error(&json!({"error": {"code": 1}})), None);
        assert_eq!(model_error(&json!([{"error": "x"}])), None);
    }
}
