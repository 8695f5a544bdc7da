//! Per-route request metrics.
//!
//! `RequestMetricsLayer` wraps a single handler, the way a route is
//! instrumented under a label, and records a request counter and a latency
//! histogram through the `metrics` facade. The wrapped handler is unaware of
//! the layer, so handlers stay testable without it.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::http::{Request, Response};
use tower::{Layer, Service};

/// Counter of handled requests, labelled by `handler` and `status`.
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";

/// Histogram of request latency in seconds, labelled by `handler`.
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";

// ---------------------------------------------------------------------------
// RequestMetricsLayer
// ---------------------------------------------------------------------------

/// Tower layer that instruments a handler under a fixed label.
#[derive(Debug, Clone, Copy)]
pub struct RequestMetricsLayer {
    label: &'static str,
}

impl RequestMetricsLayer {
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }
}

impl<S> Layer<S> for RequestMetricsLayer {
    type Service = RequestMetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestMetricsService {
            inner,
            label: self.label,
        }
    }
}

// ---------------------------------------------------------------------------
// RequestMetricsService
// ---------------------------------------------------------------------------

/// Service wrapper that records request count and latency.
#[derive(Debug, Clone)]
pub struct RequestMetricsService<S> {
    inner: S,
    label: &'static str,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestMetricsService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let label = self.label;
        let fut = self.inner.call(request);
        Box::pin(async move {
            let start = Instant::now();
            let result = fut.await;
            let status = match &result {
                Ok(response) => response.status().as_u16().to_string(),
                Err(_) => "error".to_string(),
            };
            metrics::counter!(HTTP_REQUESTS_TOTAL, "handler" => label, "status" => status)
                .increment(1);
            metrics::histogram!(HTTP_REQUEST_DURATION_SECONDS, "handler" => label)
                .record(start.elapsed().as_secs_f64());
            result
        })
    }
}
