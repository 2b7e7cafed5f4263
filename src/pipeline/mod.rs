//! Pipeline stages for a widget conversion.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ transcript ──▶ llm ──▶ response
//! (files)   (messages)     (API)   (JSON)
//! ```
//!
//! 1. [`input`]      — read and parse the example pairs and target document
//! 2. [`transcript`] — lay them out as system / user / assistant messages
//! 3. [`llm`]        — one completion request; the only stage with network I/O
//! 4. [`response`]   — turn the reply text back into a JSON value

pub mod input;
pub mod llm;
pub mod response;
pub mod transcript;
