//! Error taxonomy for Reverser calls.

/// Errors returned by a [`Reverser`](crate::Reverser) call.
///
/// The variants split into two classes. Infrastructure failures
/// (`Remote`, `DeadlineExceeded`) mean the call could not be completed;
/// everything else is an error the callee declared about the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReverseError {
    /// The call could not be completed (callee unreachable, transport failure,
    /// unexpected or undecodable reply).
    #[error("remote call failed: {0}")]
    Remote(String),
    /// The call budget expired before a reply arrived.
    #[error("call deadline exceeded after {timeout_ms}ms")]
    DeadlineExceeded { timeout_ms: u64 },
    /// The callee rejected the input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ReverseError {
    /// Returns `true` for failures of the transport or runtime layer.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_) | Self::DeadlineExceeded { .. })
    }
}
