//! Model interaction: send the transcript and hand back the raw reply.
//!
//! This stage is intentionally thin: prompt text lives in
//! [`crate::prompts`], parsing in [`super::response`]. One request, one
//! attempt; a transport error ends the run.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::pipeline::transcript::Transcript;
use crate::transport::{Completion, CompletionRequest, CompletionTransport};
use std::time::Instant;
use tracing::{debug, info};

/// Build the request from the config: model, temperature, token budget, transcript.
pub fn build_request(transcript: Transcript, config: &ConversionConfig) -> CompletionRequest {
    CompletionRequest {
        model: config.model.clone(),
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        messages: transcript,
    }
}

/// Send `request` once and return the completion with its wall-clock duration.
pub async fn request_completion(
    transport: &dyn CompletionTransport,
    request: &CompletionRequest,
) -> Result<(Completion, u64), ConvertError> {
    let start = Instant::now();
    info!(
        "Requesting completion from {} (model {}, {} messages)",
        transport.name(),
        request.model,
        request.messages.len()
    );

    let completion = transport.complete(request).await?;
    let duration_ms = start.elapsed().as_millis() as u64;

    debug!(
        "{} input tokens, {} output tokens, {}ms",
        completion.prompt_tokens, completion.completion_tokens, duration_ms
    );
    Ok((completion, duration_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn build_request_defaults() {
        let config = ConversionConfig::default();
        let t = Transcript::build("SYS", &[], &json!({}));
        let req = build_request(t, &config);
        assert_eq!(req.model, "gpt-4o-mini");
        assert_eq!(req.temperature, 0.0);
        assert_eq!(req.max_tokens, 2000);
        assert_eq!(req.messages.len(), 2);
    }
}
