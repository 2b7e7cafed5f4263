//! Result types returned by a conversion.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The outcome of one successful conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The converted document, as parsed from the model's reply.
    pub document: Value,
    /// The reply text exactly as the transport returned it.
    pub raw_response: String,
    pub stats: ConversionStats,
}

/// Bookkeeping for one conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Model identifier the request was sent with.
    pub model: String,
    pub example_pairs: usize,
    pub transcript_messages: usize,
    /// Prompt tokens reported by the API (0 when not reported).
    pub input_tokens: usize,
    /// Completion tokens reported by the API (0 when not reported).
    pub output_tokens: usize,
    pub request_duration_ms: u64,
    pub total_duration_ms: u64,
}
