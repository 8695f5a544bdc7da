/// Default call budget when the caller does not supply one.
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 5_000;

/// Per-call context carried from the front door into the Reverser.
///
/// Threaded through the call pipeline and forwarded over the wire by the
/// remote adapter so both sides log the same `request_id` and honor the
/// same budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    /// Process-unique identifier for this call.
    pub call_id: u64,
    /// `x-request-id` of the inbound HTTP request, if one was assigned.
    pub request_id: Option<String>,
    /// Deadline budget for the call in milliseconds.
    pub timeout_ms: u64,
}

impl CallContext {
    /// Creates a context with no request id.
    #[must_use]
    pub fn new(call_id: u64, timeout_ms: u64) -> Self {
        Self {
            call_id,
            request_id: None,
            timeout_ms,
        }
    }

    /// Attaches the inbound request id.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::new(0, DEFAULT_CALL_TIMEOUT_MS)
    }
}
