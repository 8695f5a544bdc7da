//! HTTP handler definitions for the greeter server.
//!
//! This module defines `AppState` (the shared state carried through axum
//! extractors) and re-exports all handler functions for convenient access
//! when building the router.

pub mod health;
pub mod hello;
pub mod reverse;

pub use health::{health_handler, liveness_handler, readiness_handler};
pub use hello::{hello_handler, DEFAULT_NAME};
pub use reverse::reverse_handler;

use std::sync::Arc;
use std::time::Instant;

use axum::http::HeaderMap;
use greeter_core::wire::REQUEST_ID_HEADER;
use greeter_core::Reverser;

use super::{NetworkConfig, ShutdownController};
use crate::service::{build_reverser_pipeline, CallContextFactory, ReverserPipeline, ServerConfig};

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc` references and the cheaply clonable call pipeline, so cloning
/// per request is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Graceful shutdown controller with health state and in-flight tracking.
    pub shutdown: Arc<ShutdownController>,
    /// Network configuration (bind address, TLS, timeouts).
    pub config: Arc<NetworkConfig>,
    /// Component configuration (role, placement, call budget).
    pub server: Arc<ServerConfig>,
    /// Reverser call pipeline wrapping the resolved adapter.
    pub reverser: ReverserPipeline,
    /// Issues call contexts with unique call ids.
    pub calls: Arc<CallContextFactory>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Assembles state around an already-resolved Reverser.
    #[must_use]
    pub fn new(
        config: NetworkConfig,
        server: ServerConfig,
        reverser: Arc<dyn Reverser>,
        shutdown: Arc<ShutdownController>,
    ) -> Self {
        let calls = Arc::new(CallContextFactory::new(server.call_timeout_ms));
        Self {
            shutdown,
            config: Arc::new(config),
            server: Arc::new(server),
            reverser: build_reverser_pipeline(reverser),
            calls,
            start_time: Instant::now(),
        }
    }
}

/// Reads the `x-request-id` assigned by the transport middleware.
pub(crate) fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}
