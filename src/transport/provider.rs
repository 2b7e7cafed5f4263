//! Adapter from `edgequake-llm` providers to [`CompletionTransport`].
//!
//! `ProviderFactory` reads the provider's own API-key variable
//! (`ANTHROPIC_API_KEY`, `GEMINI_API_KEY`, …), so this path is opt-in: it is
//! only used when the caller names a provider explicitly.

use super::{Completion, CompletionRequest, CompletionTransport};
use crate::error::{ConvertError, TransportError};
use crate::pipeline::transcript::{Message, Role};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;

/// A [`CompletionTransport`] backed by an `edgequake-llm` provider.
pub struct ProviderTransport {
    name: String,
    provider: Arc<dyn LLMProvider>,
}

impl ProviderTransport {
    /// Wrap an already-constructed provider.
    pub fn new(name: impl Into<String>, provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            name: name.into(),
            provider,
        }
    }

    /// Build a named provider (`"anthropic"`, `"gemini"`, `"ollama"`, …) for `model`.
    pub fn from_name(provider_name: &str, model: &str) -> Result<Self, ConvertError> {
        let provider = ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
            ConvertError::TransportNotConfigured {
                hint: format!("LLM provider '{provider_name}' could not be created: {e}"),
            }
        })?;
        Ok(Self::new(provider_name, provider))
    }
}

fn to_chat_message(message: &Message) -> ChatMessage {
    match message.role {
        Role::System => ChatMessage::system(message.content.as_str()),
        Role::User => ChatMessage::user(message.content.as_str()),
        Role::Assistant => ChatMessage::assistant(message.content.as_str()),
    }
}

#[async_trait]
impl CompletionTransport for ProviderTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, TransportError> {
        let messages: Vec<ChatMessage> = request
            .messages
            .messages()
            .iter()
            .map(to_chat_message)
            .collect();

        let options = CompletionOptions {
            temperature: Some(request.temperature),
            max_tokens: Some(request.max_tokens),
            ..Default::default()
        };

        let response = self
            .provider
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| TransportError::Provider {
                provider: self.name.clone(),
                detail: e.to_string(),
            })?;

        Completion::from_reply(
            &self.name,
            Some(response.content),
            response.prompt_tokens,
            response.completion_tokens,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureStage;
    use edgequake_llm::ChatRole;

    #[test]
    fn roles_map_one_to_one() {
        let system = to_chat_message(&Message::system("rules"));
        let user = to_chat_message(&Message::user("{\"elType\":\"container\"}"));
        let assistant = to_chat_message(&Message::assistant("{\"elType\":\"e-flexbox\"}"));

        assert!(matches!(system.role, ChatRole::System));
        assert!(matches!(user.role, ChatRole::User));
        assert!(matches!(assistant.role, ChatRole::Assistant));
        assert_eq!(system.content, "rules");
        assert_eq!(assistant.content, "{\"elType\":\"e-flexbox\"}");
    }

    #[test]
    fn unknown_provider_is_a_config_error() {
        let err = ProviderTransport::from_name("no-such-provider", "m")
            .err()
            .expect("unknown provider must not build");
        assert!(matches!(err, ConvertError::TransportNotConfigured { .. }));
        assert_eq!(err.stage(), FailureStage::Config);
        assert!(err.to_string().contains("no-such-provider"));
    }
}
