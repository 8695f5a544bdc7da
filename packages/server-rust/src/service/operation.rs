//! The operation dispatched through the call pipeline.

use std::sync::atomic::{AtomicU64, Ordering};

use greeter_core::CallContext;

/// A single Reverser call travelling through the pipeline.
#[derive(Debug, Clone)]
pub struct ReverseCall {
    pub ctx: CallContext,
    pub text: String,
}

impl ReverseCall {
    #[must_use]
    pub fn new(ctx: CallContext, text: impl Into<String>) -> Self {
        Self {
            ctx,
            text: text.into(),
        }
    }
}

/// Issues `CallContext` values with process-unique call ids.
#[derive(Debug)]
pub struct CallContextFactory {
    call_id_counter: AtomicU64,
    default_timeout_ms: u64,
}

impl CallContextFactory {
    #[must_use]
    pub fn new(default_timeout_ms: u64) -> Self {
        Self {
            call_id_counter: AtomicU64::new(1),
            default_timeout_ms,
        }
    }

    fn next_call_id(&self) -> u64 {
        self.call_id_counter.fetch_add(1, Ordering::Relaxed)
    }

    /// Builds a context for a new call.
    ///
    /// `timeout_ms` overrides the default budget, e.g. when a remote caller
    /// forwarded its own remaining budget. A zero override is ignored.
    pub fn make_ctx(&self, request_id: Option<String>, timeout_ms: Option<u64>) -> CallContext {
        let timeout_ms = timeout_ms
            .filter(|ms| *ms > 0)
            .unwrap_or(self.default_timeout_ms);
        CallContext {
            call_id: self.next_call_id(),
            request_id,
            timeout_ms,
        }
    }
}
