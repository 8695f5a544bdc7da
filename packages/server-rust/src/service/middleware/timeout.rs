//! Timeout middleware for Reverser calls.
//!
//! Rejects calls that exceed their `ctx.timeout_ms` with
//! `ReverseError::DeadlineExceeded`. The inner future is dropped on expiry,
//! which cancels a pending remote request.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use greeter_core::ReverseError;
use tower::{Layer, Service};

use crate::service::operation::ReverseCall;

// ---------------------------------------------------------------------------
// TimeoutLayer
// ---------------------------------------------------------------------------

/// Tower layer that wraps services with per-call timeout enforcement.
///
/// The timeout is read from each call's `ctx.timeout_ms`, so a budget
/// forwarded by a remote caller is honored here too.
#[derive(Debug, Clone)]
pub struct TimeoutLayer;

impl<S> Layer<S> for TimeoutLayer {
    type Service = TimeoutService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TimeoutService { inner }
    }
}

// ---------------------------------------------------------------------------
// TimeoutService
// ---------------------------------------------------------------------------

/// Service wrapper that enforces per-call timeouts.
#[derive(Debug, Clone)]
pub struct TimeoutService<S> {
    inner: S,
}

impl<S> Service<ReverseCall> for TimeoutService<S>
where
    S: Service<ReverseCall, Response = String, Error = ReverseError> + Send,
    S::Future: Send + 'static,
{
    type Response = String;
    type Error = ReverseError;
    type Future = Pin<Box<dyn Future<Output = Result<String, ReverseError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, call: ReverseCall) -> Self::Future {
        let timeout_ms = call.ctx.timeout_ms;
        let fut = self.inner.call(call);
        Box::pin(async move {
            let duration = Duration::from_millis(timeout_ms);
            match tokio::time::timeout(duration, fut).await {
                Ok(result) => result,
                Err(_elapsed) => Err(ReverseError::DeadlineExceeded { timeout_ms }),
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
