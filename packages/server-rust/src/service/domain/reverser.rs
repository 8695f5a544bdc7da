//! In-process Reverser adapter.

use async_trait::async_trait;
use greeter_core::{reverse_chars, CallContext, ReverseError, Reverser};
use tracing::{debug, info};

use super::REVERSER_SERVICE;
use crate::service::registry::{ManagedService, ServiceContext};

/// Reverser that runs in the caller's process. Never fails.
#[derive(Debug, Default)]
pub struct LocalReverser;

impl LocalReverser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ManagedService for LocalReverser {
    fn name(&self) -> &'static str {
        REVERSER_SERVICE
    }

    async fn init(&self, ctx: &ServiceContext) -> anyhow::Result<()> {
        info!(node_id = %ctx.config.node_id, "reverser component colocated");
        Ok(())
    }

    async fn shutdown(&self, _terminate: bool) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl Reverser for LocalReverser {
    async fn reverse(&self, ctx: &CallContext, text: &str) -> Result<String, ReverseError> {
        debug!(call_id = ctx.call_id, chars = text.chars().count(), "reversing in-process");
        Ok(reverse_chars(text))
    }
}
