//! Conversion entry points.
//!
//! [`convert`] is the invoker: load inputs, build the transcript, send one
//! request, parse the reply. [`convert_to_file`] is the driver on top of it:
//! optionally wrap the result in the page [`Envelope`] and persist it
//! pretty-printed. Nothing is written unless every step succeeded.

use crate::config::{ConversionConfig, OutputMode};
use crate::envelope::Envelope;
use crate::error::ConvertError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::transcript::Transcript;
use crate::pipeline::{input, llm, response};
use crate::prompts::DEFAULT_SYSTEM_PROMPT;
use crate::transport::{CompletionTransport, OpenAiClient, ProviderTransport};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert the configured target document.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// - input stage: an example or target file is missing, unreadable, or not
///   JSON (reported before any transport is resolved)
/// - config stage: no transport is configured
/// - transport stage: the completion request failed
/// - response stage: the reply is not JSON, or is a model-emitted
///   `{"error": ...}` object while `accept_error_payload` is off
pub async fn convert(config: &ConversionConfig) -> Result<ConversionOutput, ConvertError> {
    let total_start = Instant::now();
    info!("Starting conversion: {}", config.input_path.display());

    // ── Step 1: Load example pairs and target ────────────────────────────
    let inputs = input::load_inputs(config).await?;
    debug!("Loaded {} example pairs", inputs.pairs.len());
    if let Some(ref obs) = config.observer {
        obs.on_inputs_loaded(inputs.pairs.len());
    }

    // ── Step 2: Resolve transport ────────────────────────────────────────
    let transport = resolve_transport(config)?;

    // ── Step 3: Build transcript ─────────────────────────────────────────
    let transcript = Transcript::build(system_prompt(config), &inputs.pairs, &inputs.target);
    let transcript_messages = transcript.len();
    let request = llm::build_request(transcript, config);

    // ── Step 4: Request completion ───────────────────────────────────────
    if let Some(ref obs) = config.observer {
        obs.on_request_start(transport.name(), transcript_messages);
    }
    let (completion, request_duration_ms) =
        llm::request_completion(transport.as_ref(), &request).await?;

    if config.log_raw_response {
        info!("Raw response from {}:\n{}", transport.name(), completion.content);
        if let Some(ref obs) = config.observer {
            obs.on_raw_response(&completion.content);
        }
    }

    // ── Step 5: Parse reply ──────────────────────────────────────────────
    let document = response::parse_document(&completion.content, config.strip_code_fences)?;
    if let Some(message) = response::model_error(&document) {
        if !config.accept_error_payload {
            return Err(ConvertError::ModelReported {
                message: message.to_string(),
            });
        }
        warn!("Model returned an error payload: {}", message);
    }

    let stats = ConversionStats {
        model: request.model.clone(),
        example_pairs: inputs.pairs.len(),
        transcript_messages,
        input_tokens: completion.prompt_tokens,
        output_tokens: completion.completion_tokens,
        request_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} tokens in / {} out, {}ms total",
        stats.input_tokens, stats.output_tokens, stats.total_duration_ms
    );
    if let Some(ref obs) = config.observer {
        obs.on_conversion_complete(&stats);
    }

    Ok(ConversionOutput {
        document,
        raw_response: completion.content,
        stats,
    })
}

/// Convert and write the result, pretty-printed, to `output_path`.
///
/// Uses atomic write (temp file in the target directory + rename) so a
/// failed run never leaves a partial file behind.
pub async fn convert_to_file(
    config: &ConversionConfig,
    output_path: impl AsRef<Path>,
    mode: OutputMode,
) -> Result<ConversionStats, ConvertError> {
    let output = convert(config).await?;
    let text = render_output(output.document, mode)?;
    write_output(output_path.as_ref(), text).await?;
    info!("Saved converted widget to {}", output_path.as_ref().display());
    Ok(output.stats)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(config: &ConversionConfig) -> Result<ConversionOutput, ConvertError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ConvertError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(config))
}

/// Load the inputs and build the transcript without sending it.
///
/// Does not require a transport or API key.
pub async fn inspect(config: &ConversionConfig) -> Result<Transcript, ConvertError> {
    let inputs = input::load_inputs(config).await?;
    Ok(Transcript::build(system_prompt(config), &inputs.pairs, &inputs.target))
}

/// Pretty-print the document (two-space indent), enveloped or bare.
pub fn render_output(document: Value, mode: OutputMode) -> Result<String, ConvertError> {
    let rendered = match mode {
        OutputMode::Enveloped => serde_json::to_string_pretty(&Envelope::wrap(document)),
        OutputMode::Document => serde_json::to_string_pretty(&document),
    };
    rendered.map_err(|e| ConvertError::Internal(format!("Failed to serialise output: {e}")))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// The configured system prompt, or the default when unset or blank.
fn system_prompt(config: &ConversionConfig) -> &str {
    config
        .system_prompt
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or(DEFAULT_SYSTEM_PROMPT)
}

/// Resolve the transport, from most-specific to least-specific.
///
/// 1. **Pre-built transport** (`config.transport`) — used as-is. This is
///    how tests and embedding applications plug in their own client.
/// 2. **Named provider** (`config.provider_name`) — built through
///    `edgequake-llm`'s `ProviderFactory`, which reads that provider's own
///    key variable.
/// 3. **API key** (`config.api_key`) — the OpenAI-compatible client against
///    `config.api_base` or the public endpoint. The key is not validated
///    here; a bad key surfaces as an auth error from the API.
fn resolve_transport(
    config: &ConversionConfig,
) -> Result<Arc<dyn CompletionTransport>, ConvertError> {
    if let Some(ref transport) = config.transport {
        return Ok(Arc::clone(transport));
    }

    if let Some(ref name) = config.provider_name {
        if name != "openai" || config.api_key.is_none() {
            return Ok(Arc::new(ProviderTransport::from_name(name, &config.model)?));
        }
    }

    if let Some(ref key) = config.api_key {
        let client = match config.api_base {
            Some(ref base) => OpenAiClient::with_base_url(key.as_str(), base.as_str()),
            None => OpenAiClient::new(key.as_str()),
        };
        return Ok(Arc::new(client));
    }

    Err(ConvertError::TransportNotConfigured {
        hint: "Set an API key (OPENAI_API_KEY / --api-key), name a provider \
               (--provider), or supply a transport in the config."
            .to_string(),
    })
}

/// Atomically write `text` to `path`, creating parent directories.
async fn write_output(path: &Path, text: String) -> Result<(), ConvertError> {
    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || write_output_blocking(&target, &text))
        .await
        .map_err(|e| ConvertError::Internal(format!("Write task panicked: {}", e)))?
}

fn write_output_blocking(path: &Path, text: &str) -> Result<(), ConvertError> {
    let write_err = |source: std::io::Error| ConvertError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir: PathBuf = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(write_err)?;
    tmp.write_all(text.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn render_document_is_two_space_pretty() {
        let s = render_output(json!({"id": "a", "elements": []}), OutputMode::Document).unwrap();
        assert_eq!(s, "{\n  \"id\": \"a\",\n  \"elements\": []\n}");
    }

    #[test]
    fn render_enveloped_wraps_document() {
        let s = render_output(json!({"id": "a"}), OutputMode::Enveloped).unwrap();
        let v: Value = serde_json::from_str(&s).unwrap();
        assert_eq!(v["content"][0]["id"], "a");
        assert_eq!(v["type"], "e-flexbox");
        assert!(s.starts_with("{\n  \"content\": ["));
    }

    #[test]
    fn no_transport_configured() {
        let config = ConversionConfig::default();
        let err = resolve_transport(&config).err().unwrap();
        assert!(matches!(err, ConvertError::TransportNotConfigured { .. }));
    }

    #[test]
    fn api_key_builds_openai_client() {
        let config = ConversionConfig::builder().api_key("sk-test").build().unwrap();
        let t = resolve_transport(&config).unwrap();
        assert_eq!(t.name(), "openai");
    }

    #[test]
    fn openai_provider_name_with_key_uses_direct_client() {
        let config = ConversionConfig::builder()
            .provider_name("openai")
            .api_key("sk-test")
            .build()
            .unwrap();
        assert_eq!(resolve_transport(&config).unwrap().name(), "openai");
    }

    #[test]
    fn write_creates_parent_dirs_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.json");
        write_output_blocking(&path, "first").unwrap();
        write_output_blocking(&path, "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }
}
