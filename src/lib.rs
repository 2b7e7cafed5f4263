//! # flexbox-convert
//!
//! Convert Elementor V3 container widgets to Elementor V4 `e-flexbox`
//! widgets by few-shot prompting a chat-completion model.
//!
//! The conversion rules live in the system prompt and in a handful of
//! example `(V3, V4)` document pairs; the model does the mapping. This crate
//! is the plumbing around it: load the documents, lay them out as a chat
//! transcript, make one request, parse the JSON reply, and write it out.
//!
//! ## Pipeline Overview
//!
//! ```text
//! container-v3-N.json / container-v4-N.json / container-user.json
//!  │
//!  ├─ 1. Input       read + parse every document (fails before any API call)
//!  ├─ 2. Transcript  system, (user, assistant) × N, user
//!  ├─ 3. Request     one completion, temperature 0, bounded max_tokens
//!  ├─ 4. Response    reply text → JSON
//!  └─ 5. Output      optional page envelope, pretty-printed file
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flexbox_convert::{convert_to_file, ConversionConfig, OutputMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .api_key(std::env::var("OPENAI_API_KEY")?)
//!         .log_raw_response(true)
//!         .build()?;
//!     let stats = convert_to_file(
//!         &config,
//!         "converted-real-widget-wrapped.json",
//!         OutputMode::Enveloped,
//!     )
//!     .await?;
//!     eprintln!("{} tokens in / {} out", stats.input_tokens, stats.output_tokens);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `flexbox-convert` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod envelope;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod transport;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, ExamplePairPaths, OutputMode};
pub use convert::{convert, convert_sync, convert_to_file, inspect, render_output};
pub use envelope::Envelope;
pub use error::{ConvertError, FailureStage, TransportError};
pub use output::{ConversionOutput, ConversionStats};
pub use pipeline::transcript::{ExamplePair, Message, Role, Transcript};
pub use progress::{ConversionObserver, NoopObserver, Observer};
pub use transport::{
    Completion, CompletionRequest, CompletionTransport, OpenAiClient, ProviderTransport,
};
