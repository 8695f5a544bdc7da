//! Metrics middleware for Reverser calls.
//!
//! Wraps each call in a `tracing` span and records a call counter and a
//! duration histogram through the `metrics` facade.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use greeter_core::ReverseError;
use tower::{Layer, Service};
use tracing::{info_span, Instrument};

use crate::service::operation::ReverseCall;

/// Counter of completed calls, labelled by `outcome`.
pub const CALLS_TOTAL: &str = "reverser_calls_total";

/// Histogram of call durations in seconds.
pub const CALL_DURATION_SECONDS: &str = "reverser_call_duration_seconds";

// ---------------------------------------------------------------------------
// MetricsLayer
// ---------------------------------------------------------------------------

/// Tower layer that instruments Reverser calls with timing and counting.
#[derive(Debug, Clone)]
pub struct MetricsLayer;

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsService { inner }
    }
}

// ---------------------------------------------------------------------------
// MetricsService
// ---------------------------------------------------------------------------

/// Service wrapper that records call duration and outcome.
#[derive(Debug, Clone)]
pub struct MetricsService<S> {
    inner: S,
}

/// Label value for a call result.
fn outcome(result: &Result<String, ReverseError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(ReverseError::InvalidInput(_)) => "invalid_input",
        Err(ReverseError::DeadlineExceeded { .. }) => "deadline_exceeded",
        Err(ReverseError::Remote(_)) => "remote_error",
    }
}

impl<S> Service<ReverseCall> for MetricsService<S>
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
        let call_id = call.ctx.call_id;

        let span = info_span!(
            "reverse_call",
            call_id = call_id,
            request_id = call.ctx.request_id.as_deref().unwrap_or(""),
            duration_ms = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );

        let fut = self.inner.call(call);

        Box::pin(
            async move {
                let start = Instant::now();
                let result = fut.await;
                let elapsed = start.elapsed();
                let outcome = outcome(&result);

                #[allow(clippy::cast_possible_truncation)]
                let duration_ms = elapsed.as_millis() as u64;
                tracing::Span::current().record("duration_ms", duration_ms);
                tracing::Span::current().record("outcome", outcome);

                metrics::counter!(CALLS_TOTAL, "outcome" => outcome).increment(1);
                metrics::histogram!(CALL_DURATION_SECONDS).record(elapsed.as_secs_f64());

                tracing::debug!(call_id, duration_ms, outcome, "reverse call complete");

                result
            }
            .instrument(span),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use greeter_core::CallContext;
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::capture_metrics;

    /// Service that replies with a fixed result.
    struct FixedService(Result<String, ReverseError>);

    impl Service<ReverseCall> for FixedService {
        type Response = String;
        type Error = ReverseError;
        type Future = Pin<Box<dyn Future<Output = Result<String, ReverseError>> + Send>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, _call: ReverseCall) -> Self::Future {
            let result = self.0.clone();
            Box::pin(async move { result })
        }
    }

    fn make_call() -> ReverseCall {
        ReverseCall::new(CallContext::new(42, 1000), "abc")
    }

    #[tokio::test]
    async fn passes_through_success() {
        let svc = MetricsLayer.layer(FixedService(Ok("cba".to_string())));
        assert_eq!(svc.oneshot(make_call()).await.unwrap(), "cba");
    }

    #[tokio::test]
    async fn passes_through_error_unchanged() {
        let err = ReverseError::Remote("boom".to_string());
        let svc = MetricsLayer.layer(FixedService(Err(err.clone())));
        assert_eq!(svc.oneshot(make_call()).await.unwrap_err(), err);
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(outcome(&Ok(String::new())), "ok");
        assert_eq!(
            outcome(&Err(ReverseError::InvalidInput(String::new()))),
            "invalid_input"
        );
        assert_eq!(
            outcome(&Err(ReverseError::DeadlineExceeded { timeout_ms: 1 })),
            "deadline_exceeded"
        );
        assert_eq!(
            outcome(&Err(ReverseError::Remote(String::new()))),
            "remote_error"
        );
    }

    #[test]
    fn records_calls_by_outcome_and_duration() {
        let ((), recorded) = capture_metrics(async {
            let ok = MetricsLayer.layer(FixedService(Ok("cba".to_string())));
            ok.oneshot(make_call()).await.unwrap();
            let failing = MetricsLayer.layer(FixedService(Err(ReverseError::Remote(
                "boom".to_string(),
            ))));
            failing.oneshot(make_call()).await.unwrap_err();
        });

        assert_eq!(recorded.counter(CALLS_TOTAL, &[("outcome", "ok")]), Some(1));
        assert_eq!(
            recorded.counter(CALLS_TOTAL, &[("outcome", "remote_error")]),
            Some(1)
        );
        assert_eq!(recorded.counter(CALLS_TOTAL, &[("outcome", "invalid_input")]), None);
        assert_eq!(recorded.histogram_samples(CALL_DURATION_SECONDS, &[]), 2);
    }
}
