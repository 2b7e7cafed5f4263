//! Configuration types for widget conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The defaults reproduce the classic
//! setup: three numbered example pairs and `container-user.json` in the
//! working directory, `gpt-4o-mini` at temperature 0 with a 2000-token budget.

use crate::error::ConvertError;
use crate::progress::ConversionObserver;
use crate::transport::CompletionTransport;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default number of numbered example pairs.
pub const DEFAULT_EXAMPLE_PAIRS: usize = 3;

/// Default target document file name.
pub const DEFAULT_INPUT_FILE: &str = "container-user.json";

/// Configuration for one conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use flexbox_convert::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .examples_dir("fixtures", 2)
///     .input_path("fixtures/container-user.json")
///     .log_raw_response(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.examples.len(), 2);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Custom system prompt. If None, uses [`crate::prompts::DEFAULT_SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// Emit the unparsed model reply before parsing it. Default: false.
    pub log_raw_response: bool,

    /// Example pairs, sent in this order.
    pub examples: Vec<ExamplePairPaths>,

    /// The document to convert. Default: `container-user.json`.
    pub input_path: PathBuf,

    /// Chat model identifier. Default: `gpt-4o-mini`.
    pub model: String,

    /// Sampling temperature. Default: 0.0 (deterministic).
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 2000.
    pub max_tokens: usize,

    /// Pre-constructed transport. Takes precedence over every other transport field.
    pub transport: Option<Arc<dyn CompletionTransport>>,

    /// Named `edgequake-llm` provider (e.g. "anthropic", "gemini", "ollama").
    pub provider_name: Option<String>,

    /// API key for the OpenAI-compatible client.
    pub api_key: Option<String>,

    /// Base URL for the OpenAI-compatible client. If None, uses the public endpoint.
    pub api_base: Option<String>,

    /// Unwrap a single outer ```` ``` ```` fence before parsing. Default: true.
    pub strip_code_fences: bool,

    /// Treat a bare `{"error": "..."}` reply as a converted document
    /// instead of [`ConvertError::ModelReported`]. Default: false.
    pub accept_error_payload: bool,

    /// Observer for conversion events.
    pub observer: Option<Arc<dyn ConversionObserver>>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            system_prompt: None,
            log_raw_response: false,
            examples: ExamplePairPaths::numbered(".", DEFAULT_EXAMPLE_PAIRS),
            input_path: PathBuf::from(DEFAULT_INPUT_FILE),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            max_tokens: 2000,
            transport: None,
            provider_name: None,
            api_key: None,
            api_base: None,
            strip_code_fences: true,
            accept_error_payload: false,
            observer: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("system_prompt", &self.system_prompt.as_ref().map(|p| p.len()))
            .field("log_raw_response", &self.log_raw_response)
            .field("examples", &self.examples)
            .field("input_path", &self.input_path)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field(
                "transport",
                &self.transport.as_ref().map(|t| t.name().to_string()),
            )
            .field("provider_name", &self.provider_name)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("strip_code_fences", &self.strip_code_fences)
            .field("accept_error_payload", &self.accept_error_payload)
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn log_raw_response(mut self, v: bool) -> Self {
        self.config.log_raw_response = v;
        self
    }

    /// Replace the example list with explicit pairs.
    pub fn examples(mut self, pairs: Vec<ExamplePairPaths>) -> Self {
        self.config.examples = pairs;
        self
    }

    /// Use `count` numbered pairs from `dir` (`container-v3-N.json` / `container-v4-N.json`).
    pub fn examples_dir(mut self, dir: impl AsRef<Path>, count: usize) -> Self {
        self.config.examples = ExamplePairPaths::numbered(dir, count);
        self
    }

    /// Append one example pair after the current list.
    pub fn example_pair(mut self, input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        self.config.examples.push(ExamplePairPaths::new(input, output));
        self
    }

    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.input_path = path.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn CompletionTransport>) -> Self {
        self.config.transport = Some(transport);
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.config.api_base = Some(url.into());
        self
    }

    pub fn strip_code_fences(mut self, v: bool) -> Self {
        self.config.strip_code_fences = v;
        self
    }

    pub fn accept_error_payload(mut self, v: bool) -> Self {
        self.config.accept_error_payload = v;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn ConversionObserver>) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(ConvertError::InvalidConfig("Model must not be empty".into()));
        }
        if c.max_tokens == 0 {
            return Err(ConvertError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if !(0.0..=2.0).contains(&c.temperature) {
            return Err(ConvertError::InvalidConfig(format!(
                "Temperature must be 0.0–2.0, got {}",
                c.temperature
            )));
        }
        Ok(self.config)
    }
}

// ── Example pairs ────────────────────────────────────────────────────────

/// File locations of one example `(input, output)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamplePairPaths {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl ExamplePairPaths {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// `count` numbered pairs in `dir`: `container-v3-1.json` / `container-v4-1.json`, …
    pub fn numbered(dir: impl AsRef<Path>, count: usize) -> Vec<Self> {
        let dir = dir.as_ref();
        (1..=count)
            .map(|n| {
                Self::new(
                    dir.join(format!("container-v3-{n}.json")),
                    dir.join(format!("container-v4-{n}.json")),
                )
            })
            .collect()
    }
}

/// How the converted document is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputMode {
    /// Wrap the document in the V4 page [`crate::envelope::Envelope`]. (default)
    #[default]
    Enveloped,
    /// Write the converted document as-is.
    Document,
}

impl OutputMode {
    /// Default output file name for this mode.
    pub fn default_file_name(self) -> &'static str {
        match self {
            OutputMode::Enveloped => "converted-real-widget-wrapped.json",
            OutputMode::Document => "converted-real-widget.json",
        }
    }
}
