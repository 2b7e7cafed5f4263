//! Observer trait for conversion events.
//!
//! Inject an [`Arc<dyn ConversionObserver>`] via
//! [`crate::config::ConversionConfigBuilder::observer`] to follow a
//! conversion as it runs: drive a spinner, capture the raw model reply, or
//! record stats.
//!
//! # Example
//!
//! ```rust
//! use flexbox_convert::{ConversionConfig, ConversionObserver};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Default)]
//! struct RawCapture {
//!     raw: Mutex<Option<String>>,
//! }
//!
//! impl ConversionObserver for RawCapture {
//!     fn on_raw_response(&self, raw: &str) {
//!         *self.raw.lock().unwrap() = Some(raw.to_string());
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .log_raw_response(true)
//!     .observer(Arc::new(RawCapture::default()) as Arc<dyn ConversionObserver>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::ConversionStats;
use std::sync::Arc;

/// Called by the converter at each step of a run.
///
/// All methods have default no-op implementations so callers only
/// override what they care about.
pub trait ConversionObserver: Send + Sync {
    /// Called after every input file was loaded and parsed.
    fn on_inputs_loaded(&self, example_pairs: usize) {
        let _ = example_pairs;
    }

    /// Called just before the completion request is sent.
    ///
    /// # Arguments
    /// * `transport` — transport name, e.g. `"openai"`
    /// * `messages`  — number of transcript messages
    fn on_request_start(&self, transport: &str, messages: usize) {
        let _ = (transport, messages);
    }

    /// Called with the unparsed reply, before parsing, when
    /// `log_raw_response` is enabled.
    fn on_raw_response(&self, raw: &str) {
        let _ = raw;
    }

    /// Called once after the reply parsed successfully.
    fn on_conversion_complete(&self, stats: &ConversionStats) {
        let _ = stats;
    }
}

/// An observer that ignores every event.
pub struct NoopObserver;

impl ConversionObserver for NoopObserver {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type Observer = Arc<dyn ConversionObserver>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Tracking {
        loaded: AtomicUsize,
        requests: AtomicUsize,
        raw: Mutex<Vec<String>>,
    }

    impl ConversionObserver for Tracking {
        fn on_inputs_loaded(&self, example_pairs: usize) {
            self.loaded.store(example_pairs, Ordering::SeqCst);
        }

        fn on_request_start(&self, _transport: &str, _messages: usize) {
            self.requests.fetch_add(1, Ordering::SeqCst);
        }

        fn on_raw_response(&self, raw: &str) {
            self.raw.lock().unwrap().push(raw.to_string());
        }
    }

    #[test]
    fn noop_observer_does_not_panic() {
        let o = NoopObserver;
        o.on_inputs_loaded(3);
        o.on_request_start("openai", 8);
        o.on_raw_response("{}");
        o.on_conversion_complete(&ConversionStats::default());
    }

    #[test]
    fn tracking_observer_receives_events() {
        let t = Tracking::default();
        t.on_inputs_loaded(3);
        t.on_request_start("stub", 8);
        t.on_raw_response("{\"ok\":true}");
        assert_eq!(t.loaded.load(Ordering::SeqCst), 3);
        assert_eq!(t.requests.load(Ordering::SeqCst), 1);
        assert_eq!(t.raw.lock().unwrap().as_slice(), ["{\"ok\":true}"]);
    }

    #[test]
    fn arc_dyn_observer_works() {
        let o: Observer = Arc::new(NoopObserver);
        o.on_request_start("openai", 2);
    }
}
