//! Completion transports: where a [`Transcript`] is actually sent.
//!
//! The converter never talks to an HTTP API directly. It hands a
//! [`CompletionRequest`] to an `Arc<dyn CompletionTransport>` held by the
//! config, so tests can substitute a stub and callers can bring their own
//! client.
//!
//! Two implementations ship with the crate:
//!
//! * [`OpenAiClient`] — OpenAI-compatible `/chat/completions` over `reqwest`,
//!   with an explicit API key and base URL.
//! * [`ProviderTransport`] — any `edgequake-llm` provider (Anthropic, Gemini,
//!   Ollama, Azure, …).

mod openai;
mod provider;

pub use openai::{OpenAiClient, DEFAULT_API_BASE};
pub use provider::ProviderTransport;

use crate::error::TransportError;
use crate::pipeline::transcript::Transcript;
use async_trait::async_trait;
use serde::Serialize;

/// One non-streaming completion request.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: usize,
    pub messages: Transcript,
}

/// The text payload of a completion plus token usage, when reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
}

impl Completion {
    /// Build a completion from a provider reply; missing or empty content is
    /// [`TransportError::EmptyCompletion`].
    pub(crate) fn from_reply(
        provider: &str,
        content: Option<String>,
        prompt_tokens: usize,
        completion_tokens: usize,
    ) -> Result<Self, TransportError> {
        let content = content
            .filter(|c| !c.is_empty())
            .ok_or_else(|| TransportError::EmptyCompletion {
                provider: provider.to_string(),
            })?;
        Ok(Self {
            content,
            prompt_tokens,
            completion_tokens,
        })
    }
}

/// Sends a completion request and returns the model's reply text.
///
/// Implementations make exactly one attempt; retry policy, if any, belongs
/// to the caller.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    /// Short name used in logs and error messages, e.g. `"openai"`.
    fn name(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, TransportError>;
}
