//! Transcript assembly: example pairs + target → ordered chat messages.
//!
//! The few-shot layout is fixed:
//!
//! ```text
//! system     conversion instructions
//! user       example 1 input   (V3)
//! assistant  example 1 output  (V4)
//! …          one user/assistant pair per example, in load order
//! user       target document   (V3)
//! ```
//!
//! Documents are sent as compact JSON, the same text the model is expected
//! to answer with.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chat role of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A demonstration `(input, output)` document pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamplePair {
    pub input: Value,
    pub output: Value,
}

/// The ordered message list sent in one completion request.
///
/// Built once by [`Transcript::build`]; there are no mutators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Build the transcript: system prompt, every example pair in order,
    /// then the target document.
    pub fn build(system_prompt: &str, pairs: &[ExamplePair], target: &Value) -> Self {
        let mut messages = Vec::with_capacity(2 + pairs.len() * 2);
        messages.push(Message::system(system_prompt));
        for pair in pairs {
            messages.push(Message::user(pair.input.to_string()));
            messages.push(Message::assistant(pair.output.to_string()));
        }
        messages.push(Message::user(target.to_string()));
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pair(n: u32) -> ExamplePair {
        ExamplePair {
            input: json!({"id": format!("v3-{n}"), "elType": "container"}),
            output: json!({"id": format!("v4-{n}"), "elType": "e-flexbox"}),
        }
    }

    #[test]
    fn order_is_system_pairs_then_target() {
        let target = json!({"id": "target"});
        let t = Transcript::build("SYS", &[pair(1), pair(2)], &target);
        let roles: Vec<Role> = t.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::System,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User
            ]
        );
        assert_eq!(t.messages()[0].content, "SYS");
        assert!(t.messages()[1].content.contains("v3-1"));
        assert!(t.messages()[2].content.contains("v4-1"));
        assert!(t.messages()[3].content.contains("v3-2"));
        assert!(t.messages()[4].content.contains("v4-2"));
        assert_eq!(t.messages()[5].content, r#"{"id":"target"}"#);
    }

    #[test]
    fn no_examples_gives_system_and_target() {
        let t = Transcript::build("SYS", &[], &json!([1, 2]));
        assert_eq!(t.len(), 2);
        assert_eq!(t.messages()[1], Message::user("[1,2]"));
    }

    #[test]
    fn documents_are_compact_json() {
        let t = Transcript::build("SYS", &[pair(1)], &json!({"a": {"b": 1}}));
        assert!(!t.messages()[1].content.contains('\n'));
        assert_eq!(t.messages()[3].content, r#"{"a":{"b":1}}"#);
    }

    #[test]
    fn serialises_as_role_tagged_array() {
        let t = Transcript::build("SYS", &[], &json!(null));
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(
            v,
            json!([
                {"role": "system", "content": "SYS"},
                {"role": "user", "content": "null"}
            ])
        );
    }
}
