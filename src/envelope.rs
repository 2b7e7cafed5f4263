//! The V4 page envelope some callers wrap a converted widget in.
//!
//! The shape is fixed: the converted document is the single entry of
//! `content`, and the metadata fields are constants. Keys serialise in the
//! order `content`, `page_settings`, `version`, `title`, `type`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ENVELOPE_VERSION: &str = "0.4";
pub const ENVELOPE_TITLE: &str = "v4-new";
pub const ENVELOPE_TYPE: &str = "e-flexbox";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub content: Vec<Value>,
    pub page_settings: Vec<Value>,
    pub version: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Envelope {
    /// Wrap `document`, whatever its shape.
    pub fn wrap(document: Value) -> Self {
        Self {
            content: vec![document],
            page_settings: Vec::new(),
            version: ENVELOPE_VERSION.to_string(),
            title: ENVELOPE_TITLE.to_string(),
            kind: ENVELOPE_TYPE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrap_sets_constant_fields() {
        let env = Envelope::wrap(json!({"id": "abc", "elType": "e-flexbox"}));
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["version"], "0.4");
        assert_eq!(v["title"], "v4-new");
        assert_eq!(v["type"], "e-flexbox");
        assert_eq!(v["page_settings"], json!([]));
        assert_eq!(v["content"], json!([{"id": "abc", "elType": "e-flexbox"}]));
    }

    #[test]
    fn wrap_accepts_any_shape() {
        for doc in [json!(null), json!("text"), json!([1, 2]), json!({"error": "x"})] {
            let env = Envelope::wrap(doc.clone());
            assert_eq!(env.content, vec![doc]);
            assert_eq!(env.kind, "e-flexbox");
        }
    }

    #[test]
    fn keys_serialise_in_fixed_order() {
        let s = serde_json::to_string(&Envelope::wrap(json!(1))).unwrap();
        assert_eq!(
            s,
            r#"{"content":[1],"page_settings":[],"version":"0.4","title":"v4-new","type":"e-flexbox"}"#
        );
    }
}
