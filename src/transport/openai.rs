//! OpenAI-compatible chat-completions client.

use super::{Completion, CompletionRequest, CompletionTransport};
use crate::error::TransportError;
use crate::pipeline::transcript::Message;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Public OpenAI endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

const PROVIDER: &str = "openai";

/// Client for `POST {api_base}/chat/completions`.
///
/// The credential is passed in explicitly; this type never reads the
/// environment.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    api_base: String,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("api_base", &self.api_base)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl OpenAiClient {
    /// Client for the public OpenAI endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_API_BASE)
    }

    /// Client for any OpenAI-compatible endpoint (Azure proxy, vLLM, LiteLLM, a mock server).
    pub fn with_base_url(api_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(val) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, val);
        }
        headers
    }
}

#[derive(Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: usize,
    messages: &'a [Message],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
}

#[async_trait]
impl CompletionTransport for OpenAiClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, TransportError> {
        let body = ChatBody {
            model: &request.model,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            messages: request.messages.messages(),
            stream: false,
        };

        let url = format!("{}/chat/completions", self.api_base);
        debug!("POST {} ({} messages)", url, body.messages.len());

        let resp = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Network {
                provider: PROVIDER.to_string(),
                detail: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let retry_after_secs = resp
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let text = resp.text().await.unwrap_or_default();
            return Err(status_error(status, text, retry_after_secs));
        }

        let parsed: ChatResponse = resp.json().await.map_err(|e| TransportError::MalformedBody {
            provider: PROVIDER.to_string(),
            detail: e.to_string(),
        })?;

        let usage = parsed.usage;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);

        Completion::from_reply(
            PROVIDER,
            content,
            usage.as_ref().map_or(0, |u| u.prompt_tokens),
            usage.as_ref().map_or(0, |u| u.completion_tokens),
        )
    }
}

/// Map a non-success HTTP status to a [`TransportError`].
fn status_error(status: StatusCode, body: String, retry_after_secs: Option<u64>) -> TransportError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TransportError::Auth {
            provider: PROVIDER.to_string(),
            detail: body,
        },
        StatusCode::TOO_MANY_REQUESTS => TransportError::RateLimited {
            provider: PROVIDER.to_string(),
            retry_after_secs,
        },
        _ => TransportError::Http {
            provider: PROVIDER.to_string(),
            status: status.as_u16(),
            body,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let c = OpenAiClient::with_base_url("k", "http://localhost:8080/v1/");
        assert_eq!(c.api_base(), "http://localhost:8080/v1");
    }

    #[test]
    fn debug_redacts_key() {
        let c = OpenAiClient::new("sk-secret");
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("sk-secret"));
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "no".into(), None),
            TransportError::Auth { .. }
        ));
        assert_eq!(
            status_error(StatusCode::TOO_MANY_REQUESTS, String::new(), Some(7)),
            TransportError::RateLimited {
                provider: "openai".into(),
                retry_after_secs: Some(7)
            }
        );
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "oops".into(), None),
            TransportError::Http { status: 502, .. }
        ));
    }
}
