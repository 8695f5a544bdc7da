use async_trait::async_trait;

use crate::context::CallContext;
use crate::error::ReverseError;

/// The Reverser component contract.
///
/// Implemented by the in-process adapter and by the network client adapter.
/// Which one a caller holds is decided once at startup; callers only ever
/// see `Arc<dyn Reverser>`.
#[async_trait]
pub trait Reverser: Send + Sync {
    /// Returns `text` with its characters reversed.
    async fn reverse(&self, ctx: &CallContext, text: &str) -> Result<String, ReverseError>;
}
