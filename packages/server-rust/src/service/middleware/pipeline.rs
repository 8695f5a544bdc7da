//! Pipeline composition: wraps the resolved Reverser in the call middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use greeter_core::{ReverseError, Reverser};
use tower::{Service, ServiceBuilder};

use super::metrics::{MetricsLayer, MetricsService};
use super::timeout::{TimeoutLayer, TimeoutService};
use crate::service::operation::ReverseCall;

/// The composed call pipeline produced by [`build_reverser_pipeline`].
///
/// Cloning is cheap: every layer is a thin wrapper around the shared
/// `Arc<dyn Reverser>`.
pub type ReverserPipeline = TimeoutService<MetricsService<ReverserEndpoint>>;

// ---------------------------------------------------------------------------
// ReverserEndpoint
// ---------------------------------------------------------------------------

/// Adapts an `Arc<dyn Reverser>` into a `tower::Service<ReverseCall>`.
#[derive(Clone)]
pub struct ReverserEndpoint {
    reverser: Arc<dyn Reverser>,
}

impl ReverserEndpoint {
    #[must_use]
    pub fn new(reverser: Arc<dyn Reverser>) -> Self {
        Self { reverser }
    }
}

impl Service<ReverseCall> for ReverserEndpoint {
    type Response = String;
    type Error = ReverseError;
    type Future = Pin<Box<dyn Future<Output = Result<String, ReverseError>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, call: ReverseCall) -> Self::Future {
        let reverser = Arc::clone(&self.reverser);
        Box::pin(async move { reverser.reverse(&call.ctx, &call.text).await })
    }
}

/// Build the call pipeline around the resolved Reverser.
///
/// Layer order (outermost to innermost):
/// 1. `TimeoutLayer` -- enforce the per-call budget
/// 2. `MetricsLayer` -- record timing and outcome (closest to the actual call)
#[must_use]
pub fn build_reverser_pipeline(reverser: Arc<dyn Reverser>) -> ReverserPipeline {
    ServiceBuilder::new()
        .layer(TimeoutLayer)
        .layer(MetricsLayer)
        .service(ReverserEndpoint::new(reverser))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
