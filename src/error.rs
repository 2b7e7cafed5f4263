//! Error types for the flexbox-convert library.
//!
//! Two error types mirror the two layers of a conversion:
//!
//! * [`TransportError`] — the completion request itself failed (network,
//!   authentication, rate limit, malformed API body). Produced by every
//!   [`crate::transport::CompletionTransport`] implementation.
//!
//! * [`ConvertError`] — everything that can abort a conversion, including a
//!   wrapped [`TransportError`]. Returned from the top-level `convert*`
//!   functions.
//!
//! Every conversion failure is fatal: there is no partial result to salvage.
//! [`ConvertError::stage`] tells callers *where* the run stopped.

use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage at which a conversion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// The configuration was rejected or no transport could be built.
    Config,
    /// An example or target file was missing, unreadable, or not JSON.
    Input,
    /// The completion request failed.
    Transport,
    /// The model answered, but not with a usable JSON document.
    Response,
    /// The converted document could not be written.
    Output,
}

/// All fatal errors returned by the flexbox-convert library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// An example or target document was not found.
    #[error("Input file not found: '{path}'\nCheck the examples directory and file names.")]
    InputNotFound { path: PathBuf },

    /// Process does not have read permission on an input file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Reading an input file failed for another reason.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file exists but does not contain valid JSON.
    #[error("'{path}' is not valid JSON: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // ── Transport errors ──────────────────────────────────────────────────
    /// No transport was supplied and none could be built from the config.
    #[error("No completion transport is configured.\n{hint}")]
    TransportNotConfigured { hint: String },

    /// The completion request failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    // ── Response errors ───────────────────────────────────────────────────
    /// The model's reply could not be parsed as JSON.
    #[error("Model response is not valid JSON: {source}\nResponse starts with: {snippet:?}")]
    ResponseNotJson {
        snippet: String,
        #[source]
        source: serde_json::Error,
    },

    /// The model answered with its own `{"error": "..."}` payload.
    #[error("Model refused the conversion: {message}")]
    ModelReported { message: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output JSON file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// The pipeline stage this error belongs to.
    pub fn stage(&self) -> FailureStage {
        match self {
            ConvertError::InputNotFound { .. }
            | ConvertError::PermissionDenied { .. }
            | ConvertError::ReadFailed { .. }
            | ConvertError::InvalidJson { .. } => FailureStage::Input,
            ConvertError::Transport(_) => FailureStage::Transport,
            ConvertError::ResponseNotJson { .. } | ConvertError::ModelReported { .. } => {
                FailureStage::Response
            }
            ConvertError::OutputWriteFailed { .. } => FailureStage::Output,
            ConvertError::TransportNotConfigured { .. }
            | ConvertError::InvalidConfig(_)
            | ConvertError::Internal(_) => FailureStage::Config,
        }
    }
}

/// A failed completion request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The API rejected the credential (HTTP 401/403).
    #[error("Authentication error from '{provider}': {detail}\nCheck OPENAI_API_KEY.")]
    Auth { provider: String, detail: String },

    /// HTTP 429; `retry_after_secs` carries the server hint when present.
    #[error("Rate limit exceeded for '{provider}'")]
    RateLimited {
        provider: String,
        retry_after_secs: Option<u64>,
    },

    /// Any other non-success HTTP status.
    #[error("HTTP {status} from '{provider}': {body}")]
    Http {
        provider: String,
        status: u16,
        body: String,
    },

    /// The request never produced an HTTP response.
    #[error("Network error talking to '{provider}': {detail}")]
    Network { provider: String, detail: String },

    /// The API answered 2xx but the body was not the expected shape.
    #[error("Malformed completion body from '{provider}': {detail}")]
    MalformedBody { provider: String, detail: String },

    /// The API answered without any message content.
    #[error("'{provider}' returned an empty completion")]
    EmptyCompletion { provider: String },

    /// An `edgequake-llm` provider reported an error.
    #[error("LLM provider '{provider}' failed: {detail}")]
    Provider { provider: String, detail: String },
}
